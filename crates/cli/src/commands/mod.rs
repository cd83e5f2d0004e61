// CLI subcommands

pub mod events;
