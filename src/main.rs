use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use filter_sql::config::DEFAULT_CONFIG_FILE;
use filter_sql::value::QuoteEscaping;
use filter_sql::{CompilerConfig, SqlCompiler};

#[derive(Parser)]
#[command(name = "filter_sql", about = "Compile a JSON filter document into SQL")]
struct Cli {
    /// 输入文档路径, 缺省时从标准输入读取
    file: Option<PathBuf>,

    /// JSON配置文件
    #[arg(long, env = "FILTER_SQL_CONFIG")]
    config: Option<PathBuf>,

    /// 覆盖配置中的最大嵌套深度
    #[arg(long)]
    max_depth: Option<usize>,

    /// 将字符串中的 ' 写为 ''
    #[arg(long)]
    escape_quotes: bool,

    /// 交互模式：输入文档后以空行结束
    #[arg(short, long)]
    interactive: bool,

    /// 输出调试日志到 stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let compiler = SqlCompiler::from_config(load_config(cli)?);

    if cli.interactive {
        run_repl(&compiler)?;
        return Ok(ExitCode::SUCCESS);
    }

    let document = match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("无法读取输入文件 {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("无法读取标准输入")?;
            buffer
        }
    };

    // 成功时输出 SQL, 失败时输出单条错误信息, 都写到 stdout
    match compiler.compile(&document) {
        Ok(sql) => {
            println!("{sql}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// 优先使用 --config, 其次是当前目录下的默认配置文件, 最后使用默认配置
fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::from_json_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            match CompilerConfig::from_json_file(DEFAULT_CONFIG_FILE) {
                Ok(config) => {
                    info!(path = DEFAULT_CONFIG_FILE, "loaded compiler config");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "无法加载默认配置文件, 使用默认配置");
                    CompilerConfig::default()
                }
            }
        }
        None => CompilerConfig::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if cli.escape_quotes {
        config.quote_escaping = QuoteEscaping::Doubled;
    }
    debug!(?config, "effective compiler config");
    Ok(config)
}

fn run_repl(compiler: &SqlCompiler) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("--- filter_sql: JSON Filter 到 SQL 编译器 ---");
    println!("输入 JSON 文档, 以空行结束; 输入 :quit 退出");

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "filter> " } else { "   ...> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if buffer.is_empty() && trimmed == ":quit" {
                    break;
                }
                if !trimmed.is_empty() {
                    buffer.push_str(&line);
                    buffer.push('\n');
                    continue;
                }
                if buffer.is_empty() {
                    continue;
                }

                if let Err(e) = rl.add_history_entry(buffer.trim_end()) {
                    warn!(error = %e, "无法记录历史");
                }
                match compiler.compile(&buffer) {
                    Ok(sql) => println!("{sql}\n"),
                    Err(e) => println!("✗ {e}\n"),
                }
                buffer.clear();
            }
            Err(ReadlineError::Interrupted) => buffer.clear(),
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
