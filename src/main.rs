use clap::Parser;
use quiz_play::session::DEFAULT_QUESTION_SECONDS;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the quiz API
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,

    /// Quiz to play
    #[arg(short, long)]
    quiz: u64,

    /// User the attempt is recorded for
    #[arg(short, long)]
    user: u64,

    /// Seconds allowed per question
    #[arg(long, default_value_t = DEFAULT_QUESTION_SECONDS, value_parser = clap::value_parser!(u32).range(1..))]
    seconds: u32,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // logs go to stderr so the alternate-screen UI stays intact
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = quiz_play::client::run(args.server, args.quiz, args.user, args.seconds).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
