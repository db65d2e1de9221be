use rangex_expr::ParseError;
use rangex_rules::RuleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read values from stdin")]
    ReadStdin(#[source] std::io::Error),

    #[error("Invalid range expression '{expression}': {source}")]
    Expression {
        expression: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors caused by a malformed expression or rule on the command line.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Expression { .. } | Error::Rule(_))
    }

    /// Process exit status: 2 for usage errors, 3 for I/O failures. Status 1
    /// is left for values that fail their check.
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            2
        } else {
            3
        }
    }
}


pub type Result<T> = std::result::Result<T, Error>;
