extern crate ansi_term;
extern crate fxhash;
extern crate smallvec;
extern crate stacker;
pub mod class;
pub mod env;
pub mod error;
pub mod eval;
pub mod flow;
pub mod globals;
pub mod id_table;
pub mod instance;
pub mod method;
pub mod node;
pub mod scope;
pub mod util;
pub mod value;
pub use crate::class::*;
pub use crate::env::*;
pub use crate::error::*;
pub use crate::eval::*;
pub use crate::flow::*;
pub use crate::globals::*;
pub use crate::id_table::*;
pub use crate::instance::*;
pub use crate::method::*;
pub use crate::node::*;
pub use crate::scope::*;
pub use crate::util::*;
pub use crate::value::*;
