// ==========================================
// 环境监测配置管理系统 - dbimport 命令行入口
// ==========================================
// 职责: 参数解析、选项冲突校验、覆盖确认、流水线编排
// 流水线: (覆盖清库) → 暂存装配 → 合并 → 引用归一化 → 依序写入
// 退出码: 0 成功; 1 致命解析/IO 错误; 2 选项冲突; 3 用户拒绝覆盖确认
// ==========================================

use anyhow::Context;
use clap::Parser;
use envmon_config_db::engine::{
    DependencyOrderedWriter, MergeEngine, MergeOptions, OverwriteHandler, ReferenceNormalizer,
};
use envmon_config_db::importer::{PdtIndex, StagingAssembler};
use envmon_config_db::repository::{DatabaseIo, SqliteDatabaseIo};
use envmon_config_db::{logging, ImportOptions};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 环境监测配置库导入/合并工具
#[derive(Parser, Debug)]
#[command(name = "dbimport", version, about = "将 XML 交换文件合并进配置数据库")]
struct Cli {
    /// 只分类不写入（干跑冲突报告）
    #[arg(short = 'v', long = "validate-only")]
    validate_only: bool,

    /// 冲突时保留目标库对象
    #[arg(short = 'o', long = "keep-old")]
    keep_old: bool,

    /// 新站点 usgs 名称的缺省机构代码
    #[arg(short = 'A', long = "agency")]
    agency: Option<String>,

    /// 新平台的缺省属主机构
    #[arg(short = 'O', long = "owner")]
    owner: Option<String>,

    /// 空白平台标识符的缺省值
    #[arg(short = 'G', long = "designator")]
    designator: Option<String>,

    /// 目标数据库位置
    #[arg(short = 'E', long = "db-location", default_value = "envmon-config.db")]
    db_location: String,

    /// PDT 文件路径, 用于补全空缺平台描述
    #[arg(short = 't', long = "pdt")]
    pdt_file: Option<PathBuf>,

    /// 忽略交换文件内嵌配置, 按名称链接既有配置
    #[arg(short = 'C', long = "link-configs")]
    link_configs: bool,

    /// 覆盖模式: 导入前清空目标库（需 -y 或交互确认）
    #[arg(short = 'W', long = "overwrite")]
    overwrite: bool,

    /// 跳过覆盖确认提示
    #[arg(short = 'y', long = "yes")]
    assume_yes: bool,

    /// 接受历史平台版本（失效时间非空）
    #[arg(short = 'H', long = "allow-historical")]
    allow_historical: bool,

    /// 仅接受平台相关元素
    #[arg(short = 'p', long = "platform-related-only")]
    platform_related_only: bool,

    /// 输入交换文件
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl Cli {
    fn into_options(self) -> ImportOptions {
        ImportOptions {
            validate_only: self.validate_only,
            keep_old: self.keep_old,
            default_agency: self.agency,
            default_owner: self.owner,
            new_designator: self.designator,
            db_location: self.db_location,
            pdt_file: self.pdt_file,
            link_configs: self.link_configs,
            overwrite: self.overwrite,
            assume_yes: self.assume_yes,
            allow_historical: self.allow_historical,
            platform_related_only: self.platform_related_only,
            files: self.files,
        }
    }
}

fn main() {
    logging::init();
    let options = Cli::parse().into_options();

    // 任何 I/O 之前拒绝不一致的选项组合
    if let Err(e) = options.validate() {
        error!("{}", e);
        std::process::exit(2);
    }

    if options.overwrite && !options.assume_yes && !confirm_overwrite(&options.db_location) {
        warn!("用户拒绝覆盖确认, 未做任何修改");
        std::process::exit(3);
    }

    if let Err(e) = run(&options) {
        error!("导入失败: {:#}", e);
        std::process::exit(1);
    }
}

/// 覆盖确认: 交互 y/n 提示, 拒绝则不触碰目标库
fn confirm_overwrite(db_location: &str) -> bool {
    print!("覆盖模式将清空目标库 {} 的配置数据, 确认? [y/N] ", db_location);
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn run(options: &ImportOptions) -> anyhow::Result<()> {
    let pdt = match &options.pdt_file {
        Some(path) => Some(PdtIndex::load(path).context("加载 PDT 文件")?),
        None => None,
    };

    let io = SqliteDatabaseIo::new(&options.db_location).context("打开目标数据库")?;
    let mut destination = io.read_all().context("读入目标库")?;
    info!("目标库载入: {}", destination.counts_summary());

    if options.overwrite {
        OverwriteHandler::new(&io, options.platform_related_only)
            .clear(&mut destination)
            .context("覆盖清库")?;
    }

    let assembler = StagingAssembler::new(options.allow_historical, options.link_configs);
    let filter = options.element_filter();
    let assembled = assembler
        .assemble(&options.files, filter.as_ref())
        .context("装配暂存库")?;
    info!(
        "装配: 读取 {} 个文件, 接受 {} 个元素, 跳过 {} 个",
        assembled.files_read, assembled.elements_staged, assembled.elements_skipped
    );

    let mut staging = assembled.staging;
    if let Some(pdt) = &pdt {
        pdt.fill_platform_descriptions(&mut staging);
    }

    let merge_options = MergeOptions::new(
        options.validate_only,
        options.keep_old,
        options.overwrite,
        options.platform_related_only,
        options.new_designator.clone(),
    )?;
    let engine = MergeEngine::new(merge_options, assembled.signals);
    let outcome = engine.merge(&mut destination, &mut staging);

    ReferenceNormalizer::new(options.default_agency.clone())
        .normalize(&mut destination, &outcome.new_objects);

    if options.validate_only {
        info!(
            "校验模式: {} 个对象将被新增/替换, 未执行写入",
            outcome.new_objects.len()
        );
        return Ok(());
    }

    let writer = DependencyOrderedWriter::new(&io, options.default_owner.clone());
    let summary = writer
        .write(&mut destination, &outcome, &assembled.signals)
        .context("写入目标库")?;
    info!(
        "导入完成: 写入 {} 个对象, 跳过 {} 个, 失败 {} 个",
        summary.written, summary.skipped, summary.failed
    );
    Ok(())
}
