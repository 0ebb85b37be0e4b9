//! One module per subcommand, each exposing `Args` and `execute`.

pub mod evaluate;
pub mod replay;
pub mod train;
