mod bootstrap;
mod exec;
mod newer;
mod run;

pub use bootstrap::cmd_bootstrap;
pub use exec::cmd_exec;
pub use newer::cmd_newer;
pub use run::cmd_run;
