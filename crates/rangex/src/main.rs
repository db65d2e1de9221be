use clap::Parser;
use rangex::cli::{Cli, Command};
use rangex::commands::{check, explain, read_values, validate};
use rangex::output::Output;

fn main() -> anyhow::Result<()> {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    env_logger::init();
    let cli = Cli::parse();

    let use_color = !cli.no_color && atty::is(atty::Stream::Stdout);
    let mut output = Output::new(use_color, cli.json);

    let passed = match run(&cli.command, &mut output) {
        Ok(passed) => passed,
        Err(e) => {
            output.print_error(&e)?;
            std::process::exit(e.exit_code());
        }
    };

    std::process::exit(if passed { 0 } else { 1 });
}

fn run(command: &Command, output: &mut Output) -> rangex::Result<bool> {
    match command {
        Command::Check {
            expression,
            values,
            length,
        } => {
            let values = read_values(values, std::io::stdin().lock())?;
            let report = check(expression, &values, *length)?;
            output.print_check(&report)?;
            Ok(report.passed())
        }
        Command::Explain { expression, tokens } => {
            let report = explain(expression, *tokens)?;
            output.print_explain(&report)?;
            Ok(true)
        }
        Command::Validate {
            value,
            rules,
            message,
        } => {
            let report = validate(value, rules, message.as_deref())?;
            output.print_verdict(&report)?;
            Ok(report.verdict.is_valid())
        }
    }
}
