mod layout;
mod machine;
mod snowflake;

pub use layout::*;
pub use machine::*;
pub use snowflake::*;
