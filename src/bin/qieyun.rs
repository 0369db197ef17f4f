use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qieyun::{
    annotate, render_report, InputSource, PronunciationMap, QieyunError, TraditionalConverter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qieyun", version, about = "简转繁 + IPA 查询工具")]
struct Cli {
    /// 输入文本
    #[arg(short, long)]
    text: Option<String>,
    /// 输入文件
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// 字典文件路径 (默认: 程序目录下的 dictionary.txt)
    #[arg(short, long = "dict", env = "QIEYUN_DICT")]
    dict: Option<PathBuf>,
    /// 显示多音字所有候选
    #[arg(short, long)]
    multi: bool,
    /// 详细输出（字+IPA对照）
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("qieyun: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), QieyunError> {
    let source = InputSource::resolve(cli.text, cli.file, std::io::stdin().is_terminal())?;
    let raw_text = source.read()?;
    let converted = TraditionalConverter::new()?.convert(&raw_text);

    let dict_path = cli.dict.unwrap_or_else(default_dict_path);
    let map = PronunciationMap::load(&dict_path)?;

    let annotation = annotate(&converted, &map, cli.multi);

    print!("{}", render_report(&raw_text, &converted, &annotation, cli.verbose));
    Ok(())
}

fn default_dict_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("dictionary.txt")))
        .unwrap_or_else(|| PathBuf::from("dictionary.txt"))
}
