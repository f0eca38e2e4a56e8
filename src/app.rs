use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::{Cli, Commands, LaunchArgs, SortOrder};
use crate::config::Config;
use crate::consts::{
    DEFAULT_CUMULATIVE_LOG, DEFAULT_DISPLAY, DEFAULT_LOGS_DIR, DEFAULT_MISSIONS_DIR,
};
use crate::error::AppError;
use crate::logs::{CleanReport, clean_dir, tail_lines};
use crate::mission::{
    EnvSettings, LaunchSettings, LayoutSettings, MissionLayout, exit_code, find_records, launch,
    plan_env,
};
use crate::output::{output_clean_json, output_runs_json, print_clean_report, print_runs_table};
use crate::utils::{SystemClock, Timezone, debug_log};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) timezone: Timezone,
}

impl CommandContext<'_> {
    fn logs_dir(&self) -> PathBuf {
        self.cli
            .logs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR))
    }

    fn missions_dir(&self) -> PathBuf {
        self.cli
            .missions_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MISSIONS_DIR))
    }

    fn cumulative_log_name(&self, flag: Option<&String>) -> String {
        flag.or(self.config.cumulative_log.as_ref())
            .map_or(DEFAULT_CUMULATIVE_LOG, String::as_str)
            .to_string()
    }
}

/// Dispatch the parsed command. No subcommand means `launch` with defaults.
pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<ExitCode, AppError> {
    match &ctx.cli.command {
        None => handle_launch(ctx, &LaunchArgs::default()),
        Some(Commands::Launch(args)) => handle_launch(ctx, args),
        Some(Commands::Clean { dir, json }) => handle_clean(ctx, dir.clone(), *json),
        Some(Commands::Runs { json, order }) => handle_runs(ctx, *json, *order),
        Some(Commands::Tail { lines, file }) => handle_tail(ctx, *lines, file.clone()),
    }
}

fn handle_clean(
    ctx: &CommandContext<'_>,
    dir: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode, AppError> {
    let dir = dir.unwrap_or_else(|| ctx.logs_dir());
    let report = clean_dir(&dir)?;
    Ok(finish_clean(&report, json))
}

fn finish_clean(report: &CleanReport, json: bool) -> ExitCode {
    if json {
        println!("{}", output_clean_json(report));
    } else {
        print_clean_report(report);
    }
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn launch_settings(
    ctx: &CommandContext<'_>,
    args: &LaunchArgs,
) -> Result<LaunchSettings, AppError> {
    let config = ctx.config;
    let program = args
        .program
        .clone()
        .or_else(|| config.program.clone())
        .ok_or(AppError::NoProgram)?;
    let leading = if args.args.is_empty() {
        config.args.clone()
    } else {
        args.args.clone()
    };

    let mut vars = config.env.clone();
    vars.extend(args.env.iter().cloned());
    let env = EnvSettings {
        vars,
        display: args
            .display
            .clone()
            .or_else(|| config.display.clone())
            .unwrap_or_else(|| DEFAULT_DISPLAY.to_string()),
        venv: args.venv.clone().or_else(|| config.venv.clone()),
    };

    Ok(LaunchSettings {
        program,
        args: leading,
        layout: LayoutSettings {
            missions_dir: ctx.missions_dir(),
            logs_dir: ctx.logs_dir(),
            cumulative_log: ctx.cumulative_log_name(args.cumulative_log.as_ref()),
        },
        cumulative: args.cumulative || config.cumulative,
        env: plan_env(&env, |key| std::env::var_os(key)),
    })
}

fn handle_launch(ctx: &CommandContext<'_>, args: &LaunchArgs) -> Result<ExitCode, AppError> {
    let settings = launch_settings(ctx, args)?;

    if args.dry_run {
        print_dry_run(&settings, ctx.timezone);
        return Ok(ExitCode::SUCCESS);
    }

    let stdout = std::io::stdout();
    let mut terminal = stdout.lock();
    let outcome = launch(&settings, &SystemClock, ctx.timezone, &mut terminal)?;
    debug_log(format!("mission log {}", outcome.layout.log_file.display()));
    Ok(ExitCode::from(exit_code(outcome.status)))
}

fn print_dry_run(settings: &LaunchSettings, timezone: Timezone) {
    let layout = MissionLayout::new(&settings.layout, &SystemClock, timezone);
    println!("Timestamp:      {}", layout.timestamp);
    println!("Output dir:     {}", layout.output_dir.display());
    println!("Mission log:    {}", layout.log_file.display());
    if settings.cumulative {
        println!("Cumulative log: {}", layout.cumulative_log.display());
    }
    let mut command = vec![settings.program.clone()];
    command.extend(settings.args.iter().cloned());
    command.push(layout.output_dir.display().to_string());
    println!("Command:        {}", command.join(" "));
    for (key, value) in &settings.env {
        println!("Env:            {key}={}", value.to_string_lossy());
    }
}

fn handle_runs(
    ctx: &CommandContext<'_>,
    json: bool,
    order: SortOrder,
) -> Result<ExitCode, AppError> {
    let records = find_records(&ctx.missions_dir(), &ctx.logs_dir());
    if json {
        println!("{}", output_runs_json(&records, order));
    } else if records.is_empty() {
        println!("No mission records found.");
    } else {
        print_runs_table(&records, order, ctx.cli.use_color());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_tail(
    ctx: &CommandContext<'_>,
    lines: usize,
    file: Option<PathBuf>,
) -> Result<ExitCode, AppError> {
    let path = file.unwrap_or_else(|| ctx.logs_dir().join(ctx.cumulative_log_name(None)));
    match tail_lines(&path, lines)? {
        Some(tail) => {
            debug_log(format!(
                "showing {} of {} lines from {}",
                tail.lines.len(),
                tail.total_lines,
                path.display()
            ));
            for line in tail.lines {
                println!("{line}");
            }
        }
        None => println!("Log file not found: {}", path.display()),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn context<'a>(cli: &'a Cli, config: &'a Config) -> CommandContext<'a> {
        CommandContext {
            cli,
            config,
            timezone: Timezone::Named(chrono_tz::UTC),
        }
    }

    #[test]
    fn clean_with_a_failed_file_exits_nonzero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.log"), "data").unwrap();
        std::fs::write(dir.path().join("stuck.log"), "data").unwrap();

        let report = crate::logs::cleaner::clean_dir_failing_on(dir.path(), "stuck.log").unwrap();
        assert_eq!(report.cleared, vec![dir.path().join("ok.log")]);
        assert_eq!(finish_clean(&report, false), ExitCode::FAILURE);

        let report = clean_dir(dir.path()).unwrap();
        assert_eq!(finish_clean(&report, false), ExitCode::SUCCESS);
    }

    #[test]
    fn launch_requires_a_program() {
        let cli = Cli::parse_from(["missionctl"]);
        let config = Config::default();
        let err = launch_settings(&context(&cli, &config), &LaunchArgs::default()).unwrap_err();
        assert!(matches!(err, AppError::NoProgram));
    }

    #[test]
    fn launch_settings_merge_flags_over_config() {
        let cli = Cli::parse_from(["missionctl", "--logs-dir", "out/logs"]);
        let mut config = Config {
            program: Some("from-config".to_string()),
            args: vec!["controller.py".to_string()],
            cumulative: true,
            cumulative_log: Some("all.log".to_string()),
            ..Default::default()
        };
        config.env.insert("A".to_string(), "config".to_string());
        let args = LaunchArgs {
            program: Some("from-flag".to_string()),
            env: vec![("A".to_string(), "flag".to_string())],
            ..Default::default()
        };

        let settings = launch_settings(&context(&cli, &config), &args).unwrap();
        assert_eq!(settings.program, "from-flag");
        assert_eq!(settings.args, vec!["controller.py"]);
        assert!(settings.cumulative);
        assert_eq!(settings.layout.logs_dir, PathBuf::from("out/logs"));
        assert_eq!(settings.layout.missions_dir, PathBuf::from(DEFAULT_MISSIONS_DIR));
        assert_eq!(settings.layout.cumulative_log, "all.log");
        let a = settings.env.iter().find(|(k, _)| k == "A").map(|(_, v)| v);
        assert_eq!(a.and_then(|v| v.to_str()), Some("flag"));
    }

    #[test]
    fn cumulative_log_name_prefers_flag_then_config() {
        let cli = Cli::parse_from(["missionctl"]);
        let config = Config::default();
        assert_eq!(context(&cli, &config).cumulative_log_name(None), "missions.log");

        let config = Config {
            cumulative_log: Some("config.log".to_string()),
            ..Default::default()
        };
        let ctx = context(&cli, &config);
        assert_eq!(ctx.cumulative_log_name(None), "config.log");
        let flag = "flag.log".to_string();
        assert_eq!(ctx.cumulative_log_name(Some(&flag)), "flag.log");
    }
}
