use std::fmt;
use std::io::{self, BufRead};
use std::sync::Arc;

use exam_core::Phase;
use exam_core::model::OptionLetter;
use services::{
    Clock, DEFAULT_DURATION_SECONDS, ExamService, ExamSnapshot, HttpQuestionBank, NavigatorItem,
    QuestionBankConfig, QuestionRecord, QuestionSource, StaticQuestionBank,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --duration value (want seconds > 0): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    bank_url: String,
    topic: Option<String>,
    duration_seconds: u32,
    questions_file: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank-url <url>] [--topic <topic>]");
    eprintln!("                      [--duration <seconds>] [--questions <json_file>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank-url http://localhost:5001");
    eprintln!("  --duration {DEFAULT_DURATION_SECONDS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_BANK_URL, EXAM_BANK_TOPIC, EXAM_DURATION_SECS");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_url =
            std::env::var("EXAM_BANK_URL").unwrap_or_else(|_| "http://localhost:5001".into());
        let mut topic = std::env::var("EXAM_BANK_TOPIC")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let mut duration_seconds = std::env::var("EXAM_DURATION_SECS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_DURATION_SECONDS);
        let mut questions_file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank-url" => bank_url = require_value(args, "--bank-url")?,
                "--topic" => topic = Some(require_value(args, "--topic")?),
                "--questions" => questions_file = Some(require_value(args, "--questions")?),
                "--duration" => {
                    let value = require_value(args, "--duration")?;
                    duration_seconds = value
                        .parse::<u32>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidDuration { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank_url,
            topic,
            duration_seconds,
            questions_file,
        })
    }
}

fn build_source(args: &Args) -> Result<Arc<dyn QuestionSource>, Box<dyn std::error::Error>> {
    // A local questions file is explicit configuration: a bad path or body
    // fails fast instead of degrading like a bank fetch does.
    if let Some(path) = &args.questions_file {
        let body = std::fs::read_to_string(path)?;
        let records: Vec<QuestionRecord> = serde_json::from_str(&body)?;
        return Ok(Arc::new(StaticQuestionBank::new(records)));
    }

    let mut config = QuestionBankConfig::new(args.bank_url.clone());
    if let Some(topic) = &args.topic {
        config = config.with_topic(topic.clone());
    }
    Ok(Arc::new(HttpQuestionBank::new(config)))
}

#[derive(Debug)]
enum Command {
    Answer(String),
    Next,
    Prev,
    Goto(usize),
    Submit,
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "a" | "answer" => Command::Answer(parts.next()?.to_owned()),
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Prev,
        "g" | "goto" => {
            // display numbers are 1-based
            let number: usize = parts.next()?.parse().ok()?;
            if number == 0 {
                return None;
            }
            Command::Goto(number)
        }
        "s" | "submit" => Command::Submit,
        "r" | "show" => Command::Show,
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

fn print_help() {
    println!("Commands:");
    println!("  a <letter>   answer the current question");
    println!("  n / p        next / previous question");
    println!("  g <number>   go to question <number>");
    println!("  r            redraw the current question");
    println!("  s            submit the exam");
    println!("  q            quit without submitting");
}

fn navigator_line(items: &[NavigatorItem]) -> String {
    let mut out = String::new();
    for item in items {
        if !out.is_empty() {
            out.push(' ');
        }
        let cell = if item.answered {
            format!("{}*", item.number)
        } else if item.visited {
            format!("{}.", item.number)
        } else {
            item.number.to_string()
        };
        if item.current {
            out.push_str(&format!("[{cell}]"));
        } else {
            out.push_str(&cell);
        }
    }
    out
}

fn render(snapshot: &ExamSnapshot) {
    println!();
    println!("Time left: {}", snapshot.time_left);
    match &snapshot.current {
        Some(question) => {
            println!("{}. {}", question.number, question.prompt);
            for choice in &question.choices {
                let marker = if choice.selected { '>' } else { ' ' };
                println!(" {marker} {}", choice.label);
            }
        }
        None => println!("No questions available."),
    }
    if !snapshot.navigator.is_empty() {
        println!("Navigator: {}", navigator_line(&snapshot.navigator));
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let source = build_source(&args)?;
    let service = ExamService::new(Clock::default_clock(), source)
        .with_duration_seconds(args.duration_seconds);
    let exam = service.start_exam().await?;

    render(&exam.snapshot()?);
    print_help();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if exam.phase()? == Phase::Submitted {
            break;
        }

        match parse_command(&line) {
            None => println!("unrecognized command; type ? for help"),
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => return Ok(()),
            Some(Command::Show) => {}
            Some(Command::Answer(raw)) => match OptionLetter::new(raw) {
                Ok(letter) => {
                    if let Err(err) = exam.select_answer(letter) {
                        println!("{err}");
                    }
                }
                Err(err) => println!("{err}"),
            },
            Some(Command::Next) => exam.next()?,
            Some(Command::Prev) => exam.prev()?,
            Some(Command::Goto(number)) => {
                if let Err(err) = exam.jump(number - 1) {
                    println!("{err}");
                }
            }
            Some(Command::Submit) => {
                exam.submit()?;
            }
        }

        if exam.phase()? == Phase::Submitted {
            break;
        }
        render(&exam.snapshot()?);
    }

    // reached by submit command, timer expiry, or stdin closing
    let result = match exam.result()? {
        Some(result) => result,
        None => exam.submit()?,
    };
    println!();
    println!("Exam Completed");
    println!("Your Score: {} out of {}", result.correct, result.total);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // at this layer (binary glue), printing once is fine
        eprintln!("{err}");
        std::process::exit(2);
    }
}
