// Tool implementations behind the MCP handlers and the CLI.

pub mod manifest;
pub mod reference;
