use getopt_table::{AnyOpt, Cursor, flag, float, int, process_options, string};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut options: Vec<AnyOpt> = vec![
        flag("enable", 'e').into(),
        int("start", 's').into(),
        float("pi", 'p').into(),
        string("file", 'f').into(),
    ];

    let args: Vec<String> = std::env::args().collect();
    let mut cursor = Cursor::new();

    loop {
        let result =
            process_options(&mut cursor, &args, &mut options).unwrap_or_else(|e| e.exit());

        for opt in &options {
            println!("{}", opt);
        }

        print!("\nResidual arguments:");
        for arg in result.residual_args(&args) {
            print!(" '{}'", arg);
        }
        println!();

        if result.is_finished() {
            break;
        }
    }
}
