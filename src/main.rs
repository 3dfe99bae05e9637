use io::Write;
use std::{
    error::Error,
    fs,
    io::{self, Read},
};

use clap::{App, Arg, ArgMatches};
use sdot::frontend::{lexer::Lexer, parser::Parser, visualize::TreeBuilder};

fn main() {
    let matches = App::new("sdot")
        .version("0.1.0")
        .about("Renders the abstract syntax tree of a small Scheme dialect as a Graphviz/DOT diagram.")
        .arg(Arg::new("input")
            .value_name("FILE")
            .short('i')
            .help("Path to the source file whose AST will be rendered.")
            .takes_value(true))
        .arg(Arg::new("output")
            .long("output")
            .short('o')
            .value_name("PATH")
            .help("Write the diagram to PATH.dot instead of printing it to stdout.")
            .takes_value(true))
        .arg(Arg::new("pdf")
            .long("pdf")
            .help("Additionally render PATH.pdf with the Graphviz dot command. Only used together \
            with --output.")
            .takes_value(false))
        .arg(Arg::new("verbose")
            .short('v')
            .help("Output tokens as well as the AST. Useful for debugging.")
            .takes_value(false))
        .get_matches();

    match matches.value_of("input") {
        Some(_) => Runner::run_with_mode(RunMode::File, &matches)
            .unwrap_or_else(|err| eprintln!("{}: {}", err, matches.value_of("input").unwrap())),
        None => Runner::run_with_mode(RunMode::Prompt, &matches)
            .unwrap_or_else(|err| eprintln!("{}", err)),
    };
}

/// Indicate whether the renderer shall be run in REPL/prompt mode or on a
/// source file.
enum RunMode {
    Prompt,
    File,
}

/// Simple struct responsible for coordinating the execution of either the
/// REPL or a source file run.
struct Runner<'a> {
    mode: RunMode,
    args: &'a ArgMatches,
}

impl<'a> Runner<'a> {
    pub fn run_with_mode(mode: RunMode, args: &'a ArgMatches) -> Result<(), Box<dyn Error>> {
        let runner = Self { mode, args };
        match runner.mode {
            RunMode::File => {
                let src = runner.load_source_file()?;
                runner.run(&src);
            }
            RunMode::Prompt => runner.run_prompt()?,
        }
        Ok(())
    }

    /// Helper function for getting the content of a file.
    fn load_source_file(&self) -> Result<String, io::Error> {
        let path = self.args.value_of("input").unwrap();
        let mut file = fs::File::open(path)?;
        let mut src = String::new();
        file.read_to_string(&mut src)?;
        Ok(src)
    }

    /// Starts a REPL like prompt which renders every entered expression as a
    /// diagram. Useful for quick exploration.
    fn run_prompt(&self) -> Result<(), io::Error> {
        let mut inpt = String::new();
        println!("sdot 0.1.0\
        \nRenders the AST of a small Scheme dialect as a Graphviz/DOT diagram.\
        \nPress ctrl+d or ctrl+c to exit.");
        loop {
            print!("\u{1b}[0;38;5;36m> \u{1b}[0m");
            io::stdout().flush()?;
            let num_bytes = io::stdin().read_line(&mut inpt)?;
            let line = inpt.trim_end();
            if num_bytes == 0 {
                // Terminate line
                println!();
                return Ok(());
            }
            self.run(line);
            inpt.clear();
        }
    }

    /// Renders one source string, honoring the verbose and output flags.
    pub fn run(&self, src: &str) {
        // Tokenize the input.
        let mut lx = Lexer::new(src);
        let tokens = match lx.tokenize() {
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
            Ok(tokens) => tokens,
        };
        // Only output tokens if verbose flag is set.
        if self.args.is_present("verbose") {
            println!("Tokens:");
            tokens.iter().for_each(|token| println!("\t{}", token));
        }
        // Parse the tokens.
        let mut parser = Parser::new(tokens);
        let ast = match parser.parse() {
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
            Ok(ast) => ast,
        };
        // Only output the AST if verbose flag is set.
        if self.args.is_present("verbose") {
            println!("AST:");
            println!("\t{:?}", ast);
        }
        // Rebuild the AST as a labeled tree.
        let tree = match TreeBuilder::new().build(&ast) {
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
            Ok(tree) => tree,
        };
        match self.args.value_of("output") {
            Some(path) => {
                if let Err(e) = tree.write_to_dot(&format!("{}.dot", path)) {
                    eprintln!("{}", e);
                    return;
                }
                if self.args.is_present("pdf") {
                    tree.write_to_pdf(&format!("{}.pdf", path));
                }
            }
            None => println!("{}", tree.to_dot()),
        }
    }
}
