pub mod ssh_shell;

pub use ssh_shell::{InteractiveChannel, SshShell};
