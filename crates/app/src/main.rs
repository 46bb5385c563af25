use std::fmt;
use std::io::{self, BufRead, Write};

use lingo_core::model::{Activity, DailyWordSession, OnboardingStage, QuizSession, UserProgress};
use services::{AppServices, Clock, ContentProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [play]  [--db <sqlite_url>] [--topic <topic>]");
    eprintln!("  cargo run -p app -- word    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- quiz    [--db <sqlite_url>] [--topic <topic>]");
    eprintln!("  cargo run -p app -- profile [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:lingopop.sqlite3");
    eprintln!("  --topic \"General English\"");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_DB_URL, LINGO_AI_API_KEY, LINGO_AI_BASE_URL, LINGO_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Word,
    Quiz,
    Profile,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "word" => Some(Self::Word),
            "quiz" => Some(Self::Quiz),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    topic: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LINGO_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:lingopop.sqlite3".into()), normalize_sqlite_url);
        let mut topic = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--topic" => {
                    topic = Some(require_value(args, "--topic")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, topic })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Terminal front end: renders whatever the services return.
struct Console {
    services: AppServices,
    progress: UserProgress,
    topic: Option<String>,
}

impl Console {
    async fn open(services: AppServices, topic: Option<String>) -> Self {
        let progress = services.progress().load().await;
        Self {
            services,
            progress,
            topic,
        }
    }

    /// Ask for a name until a non-blank one is given. Returns false on EOF.
    async fn ensure_onboarded(&mut self) -> io::Result<bool> {
        if self.progress.stage() == OnboardingStage::Active {
            return Ok(true);
        }
        println!("Welcome to LingoPop! The fun way to learn English every day.");
        loop {
            let Some(name) = prompt("What should we call you? ")? else {
                return Ok(false);
            };
            match self
                .services
                .progress()
                .complete_onboarding(&self.progress, &name)
                .await
            {
                Ok(progress) => {
                    self.progress = progress;
                    return Ok(true);
                }
                Err(err) => println!("  {err}, please try again."),
            }
        }
    }

    fn show_home(&self) {
        let p = &self.progress;
        let name = if p.name().is_empty() { "Learner" } else { p.name() };
        println!();
        println!("Hi, {name}!  🔥 {} day streak", p.streak());
        println!("  Total XP: {}   Level: {}", p.xp(), p.level());
    }

    fn show_profile(&self) {
        let p = &self.progress;
        println!();
        println!("{} (Lvl {})", p.name(), p.level());
        println!("  Current streak : {} days", p.streak());
        println!("  Total XP       : {}", p.xp());
        println!("  Lessons done   : {}", p.lessons_completed());
        println!("  Words learned  : {}", p.words_learned());
        println!("  Since          : {}", p.last_login_date());
    }

    async fn daily_word(&mut self) -> io::Result<()> {
        println!("Finding a cool word...");
        let mut session = DailyWordSession::new(self.services.content().fetch_daily_word().await);
        let word = session.word().clone();
        println!();
        println!("{}  {}  {}", word.emoji, word.word, word.ipa);

        loop {
            let Some(input) = prompt("[f]lip card, [d]one, [b]ack: ")? else {
                return Ok(());
            };
            match input.as_str() {
                "f" => {
                    session.flip();
                    if session.is_revealed() {
                        println!("  {}", word.definition);
                        println!("  \"{}\"", word.example);
                        println!("  Synonyms: {}", word.synonyms.join(", "));
                    } else {
                        println!("{}  {}  {}", word.emoji, word.word, word.ipa);
                    }
                }
                "d" => {
                    if let Some(xp) = session.complete() {
                        self.award(xp, Activity::DailyWord).await;
                        println!("Good Job! +{xp} XP");
                    }
                    return Ok(());
                }
                "b" => return Ok(()),
                _ => println!("  unknown choice"),
            }
        }
    }

    async fn quiz(&mut self) -> io::Result<()> {
        println!("Preparing your challenge...");
        let questions = self
            .services
            .content()
            .fetch_quiz(self.topic.as_deref())
            .await;
        let Ok(mut quiz) = QuizSession::new(questions) else {
            println!("No questions available right now.");
            return Ok(());
        };

        while let Some(question) = quiz.current().cloned() {
            println!();
            println!("[{}%] {}", quiz.progress_percent(), question.question);
            for (idx, option) in question.options.iter().enumerate() {
                println!("  {}. {option}", idx + 1);
            }
            let choice = loop {
                let Some(input) = prompt("Your answer: ")? else {
                    return Ok(());
                };
                match input.parse::<usize>() {
                    Ok(n) if (1..=question.options.len()).contains(&n) => {
                        break question.options[n - 1].clone();
                    }
                    _ => println!("  pick 1-{}", question.options.len()),
                }
            };
            if let Ok(outcome) = quiz.answer(&choice) {
                if outcome.correct {
                    println!("  ✔ Correct!");
                } else {
                    println!("  ✘ The answer was: {}", outcome.correct_answer);
                }
            }
            if quiz.advance().is_err() {
                break;
            }
        }

        println!();
        println!(
            "Lesson Complete! You got {} out of {} correct.",
            quiz.score(),
            quiz.total()
        );
        if quiz.is_perfect() {
            println!("🎉 Perfect score!");
        }
        if let Ok(xp) = quiz.finish() {
            println!("Total XP Earned: +{xp} XP");
            self.award(xp, Activity::Quiz).await;
        }
        Ok(())
    }

    async fn award(&mut self, xp: u64, activity: Activity) {
        match self
            .services
            .progress()
            .award_experience(&self.progress, xp, activity)
            .await
        {
            Ok(progress) => self.progress = progress,
            Err(err) => info!(error = %err, "award skipped"),
        }
    }

    async fn play(&mut self) -> io::Result<()> {
        loop {
            self.show_home();
            let Some(input) = prompt("[w]ord of the day, [q]uiz, [p]rofile, e[x]it: ")? else {
                return Ok(());
            };
            match input.as_str() {
                "w" => self.daily_word().await?,
                "q" => self.quiz().await?,
                "p" => self.show_profile(),
                "x" => return Ok(()),
                _ => println!("  unknown choice"),
            }
        }
    }
}

/// Print a prompt and read one trimmed line. `None` on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let content = ContentProvider::from_env();
    info!(live = content.is_live(), db = %parsed.db_url, "starting");
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system(), content).await?;

    let mut console = Console::open(services, parsed.topic).await;
    if !console.ensure_onboarded().await? {
        return Ok(());
    }

    match cmd {
        Command::Play => console.play().await?,
        Command::Word => console.daily_word().await?,
        Command::Quiz => console.quiz().await?,
        Command::Profile => console.show_profile(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
