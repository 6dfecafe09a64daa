//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "testcraft",
    version,
    about = "Infer, enforce and template test-file conventions",
    long_about = "testcraft scans a project's JS/TS test files, infers the conventions they follow, validates files against configurable rules and hands out templates in the team's style.\n\nConfiguration precedence: CLI > .testcraft.toml > built-in defaults.\nLogging: set TESTCRAFT_LOG (e.g. TESTCRAFT_LOG=debug).",
    after_help = "Examples:\n  testcraft files src\n  testcraft analyze --sample 5\n  testcraft validate src/Button.test.tsx --output json\n  testcraft template hook --name useCart\n  testcraft run src/Button.test.tsx --name 'renders'",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "PROJECT_ROOT",
        help = "Project root (default: nearest ancestor with .testcraft.toml or .git)"
    )]
    pub root: Option<String>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// One subcommand per operation.
pub enum Commands {
    /// List test files
    #[command(
        about = "List test files",
        long_about = "List *.test.* and *.spec.* files (ts, tsx, js, jsx) under the project or a subdirectory, skipping node_modules, .git and runtime caches."
    )]
    Files {
        #[arg(help = "Subdirectory to search (default: whole project)")]
        directory: Option<String>,
    },
    /// Print a file
    #[command(
        about = "Read a file",
        long_about = "Print a file under the project root. Oversized files are rejected and long output is truncated."
    )]
    Read {
        #[arg(help = "Path relative to the project root, or absolute")]
        path: String,
    },
    /// Locate the source file a test covers
    #[command(
        about = "Find the source for a test",
        long_about = "Look for the module a test file covers, in the same directory and then its parent (for __tests__ layouts)."
    )]
    Source {
        #[arg(help = "Test file path")]
        test_path: String,
    },
    /// Infer conventions from existing tests
    #[command(
        about = "Analyze test patterns",
        long_about = "Sample the newest test files and report their structure, naming, hooks, mocking and assertion vocabulary, plus a real example block.",
        after_help = "Examples:\n  testcraft analyze\n  testcraft analyze --sample 10 --output json"
    )]
    Analyze {
        #[arg(long, default_value_t = 5, help = "Number of test files to sample")]
        sample: usize,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Validate a test file against the rules
    #[command(
        about = "Validate test style",
        long_about = "Evaluate the configured validation rules against one file. Exits 1 when any rule fails; warnings do not fail.",
        after_help = "Examples:\n  testcraft validate src/a.test.ts\n  testcraft validate src/a.test.ts --output json"
    )]
    Validate {
        #[arg(help = "Test file path")]
        path: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Print the team style guide
    #[command(about = "Show the style guide")]
    Guide,
    /// Print a test template
    #[command(
        about = "Get a test template",
        long_about = "Print a canonical template (react_component, hook, utility_function, api_service or any kind the project config adds), with the subject name substituted."
    )]
    Template {
        #[arg(help = "Template kind")]
        kind: String,
        #[arg(long, help = "Name of the component or function under test")]
        name: Option<String>,
    },
    /// Bundle a file with its issues and the matching template
    #[command(
        about = "Prepare a rewrite to the standard",
        long_about = "Print the file, its validation issues, the template that fits it and instructions for restructuring it."
    )]
    Rewrite {
        #[arg(help = "Test file path")]
        path: String,
    },
    /// Write a test file
    #[command(
        about = "Write a test file",
        long_about = "Create or overwrite a *.test.* / *.spec.* file inside the project. Content is read from --content or stdin."
    )]
    Write {
        #[arg(help = "Test file path")]
        path: String,
        #[arg(long, help = "File content (default: read stdin)")]
        content: Option<String>,
    },
    /// Replace a section of a file
    #[command(
        about = "Update a test section",
        long_about = "Replace the first exact occurrence of --old with --new."
    )]
    Update {
        #[arg(help = "Test file path")]
        path: String,
        #[arg(long = "old", help = "Exact text to replace")]
        old_text: String,
        #[arg(long = "new", help = "Replacement text")]
        new_text: String,
    },
    /// Run tests through the configured command
    #[command(
        about = "Run tests",
        long_about = "Run the configured test command (default: npm test --) under the configured timeout.",
        after_help = "Examples:\n  testcraft run\n  testcraft run src/a.test.ts --name 'adds' --coverage"
    )]
    Run {
        #[arg(help = "Test file or directory (default: all)")]
        path: Option<String>,
        #[arg(long, help = "Only run tests whose name matches")]
        name: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Collect coverage")]
        coverage: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Keep the runner in watch mode")]
        watch: bool,
    },
    /// Print a directory tree
    #[command(about = "List project structure")]
    Tree {
        #[arg(default_value = "src", help = "Starting directory")]
        directory: String,
        #[arg(long, default_value_t = 3, help = "Maximum depth")]
        depth: usize,
    },
    /// Write a starter .testcraft.toml
    #[command(
        about = "Initialize style config",
        long_about = "Write a starter .testcraft.toml at the project root unless one already exists."
    )]
    Init,
    /// Show the project's test runner configuration
    #[command(name = "runner-config", about = "Show runner config")]
    RunnerConfig,
    /// Print real examples from the newest tests
    #[command(about = "Show example tests")]
    Examples {
        #[arg(long, default_value_t = 2, help = "Number of files")]
        count: usize,
    },
}
