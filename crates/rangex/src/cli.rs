use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rangex",
    about = "Check values against range expressions and validation rules",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Test whether each value lies in a range expression
    Check {
        /// Range expression, e.g. "[0,10)&[20,30]"
        expression: String,

        /// Values to test, or "-" to read one per line from stdin
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,

        /// Test the character count of each value instead of its number
        #[arg(short, long)]
        length: bool,
    },

    /// Show the clauses a range expression parses to
    Explain {
        /// Range expression
        expression: String,

        /// Also list the lexer tokens
        #[arg(short, long)]
        tokens: bool,
    },

    /// Validate a value against one or more rules
    Validate {
        /// Value to validate
        #[arg(allow_negative_numbers = true)]
        value: String,

        /// Rule as name[:param...], e.g. "range:[0,10)" or "minlength:3:true"
        #[arg(short, long = "rule", required = true)]
        rules: Vec<String>,

        /// Message reported when a rule fails; "{0}" is the rule's first parameter
        #[arg(short, long)]
        message: Option<String>,
    },
}
