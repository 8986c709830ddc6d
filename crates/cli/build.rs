use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("precis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read web articles in the terminal")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(-s --summarize "Summarize the article and collapse the full text below the summary"))
        .arg(clap::arg!(-t --title <TITLE> "Title shown in the header (default: the page title)"))
        .arg(clap::arg!(-w --width <COLS> "Target width in terminal columns"))
        .arg(clap::arg!(--indent <STR> "Indentation prefix for every line"))
        .arg(
            clap::arg!(--view <VIEW> "Which lines to print")
                .default_value("collapsed")
                .value_parser(["encoded", "collapsed", "expanded"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(--"no-images" "Strip images from the article"))
        .arg(clap::arg!(--references "Append a numbered list of every link in the article"))
        .arg(clap::arg!(--plain "Disable ANSI styling"))
        .arg(clap::arg!(--provider <NAME> "Summary provider").value_parser(["gemini", "openai"]))
        .arg(clap::arg!(--model <MODEL> "Summary model (default depends on the provider)"))
        .arg(
            clap::arg!(-c --config <FILE> "Config file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        );

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "precis", &completions_dir).unwrap();
    }
}
