use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::consts::ANNOUNCE_FORMAT;
use crate::error::LaunchError;
use crate::utils::{Clock, Timezone, debug_log};

use super::layout::{LayoutSettings, MissionLayout};
use super::tee::Tee;

#[derive(Debug, Clone)]
pub(crate) struct LaunchSettings {
    pub(crate) program: String,
    /// Leading arguments; the output directory is always appended last
    pub(crate) args: Vec<String>,
    pub(crate) layout: LayoutSettings,
    /// Mirror output to the terminal and the cumulative log
    pub(crate) cumulative: bool,
    pub(crate) env: Vec<(String, OsString)>,
}

#[derive(Debug)]
pub(crate) struct LaunchOutcome {
    pub(crate) layout: MissionLayout,
    pub(crate) status: ExitStatus,
}

/// Run one mission: create its directories, start the controller, wait for it.
///
/// `terminal` receives the live mirror and announcements in cumulative mode.
/// The child's exit status is returned as-is; a failed mission leaves its
/// directories and logs behind.
pub(crate) fn launch(
    settings: &LaunchSettings,
    clock: &dyn Clock,
    timezone: Timezone,
    terminal: &mut dyn Write,
) -> Result<LaunchOutcome, LaunchError> {
    let layout = MissionLayout::new(&settings.layout, clock, timezone);
    layout.prepare()?;
    debug_log(format!("mission output dir {}", layout.output_dir.display()));

    let mut log = open_append(&layout.log_file)?;

    let status = if settings.cumulative {
        let mut cumulative = open_append(&layout.cumulative_log)?;
        announce(
            &mut cumulative,
            terminal,
            clock,
            timezone,
            "started",
            &layout.output_dir,
        )?;
        // The completion line follows the start line even when the spawn fails
        let status = run_mirrored(settings, &layout, &mut log, &mut cumulative, terminal);
        announce(
            &mut cumulative,
            terminal,
            clock,
            timezone,
            "completed",
            &layout.output_dir,
        )?;
        status?
    } else {
        run_to_log(settings, &layout, log)?
    };

    debug_log(format!("{} exited with {status}", settings.program));
    Ok(LaunchOutcome { layout, status })
}

fn build_command(settings: &LaunchSettings, output_dir: &Path) -> Command {
    let mut cmd = Command::new(&settings.program);
    cmd.args(&settings.args)
        .arg(output_dir)
        .envs(settings.env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::inherit());
    cmd
}

fn spawn(settings: &LaunchSettings, cmd: &mut Command) -> Result<Child, LaunchError> {
    cmd.spawn().map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LaunchError::NotFound {
                program: settings.program.clone(),
            }
        } else {
            LaunchError::Spawn {
                program: settings.program.clone(),
                source,
            }
        }
    })
}

fn wait(settings: &LaunchSettings, mut child: Child) -> Result<ExitStatus, LaunchError> {
    child.wait().map_err(|source| LaunchError::Wait {
        program: settings.program.clone(),
        source,
    })
}

/// Plain variant: stdout and stderr both land in the mission log.
fn run_to_log(
    settings: &LaunchSettings,
    layout: &MissionLayout,
    log: File,
) -> Result<ExitStatus, LaunchError> {
    let stderr = log.try_clone().map_err(|source| LaunchError::OpenLog {
        path: layout.log_file.clone(),
        source,
    })?;
    let mut cmd = build_command(settings, &layout.output_dir);
    cmd.stdout(Stdio::from(log)).stderr(Stdio::from(stderr));
    let child = spawn(settings, &mut cmd)?;
    drop(cmd);
    wait(settings, child)
}

/// Cumulative variant: one merged pipe copied through to every sink as it arrives.
fn run_mirrored(
    settings: &LaunchSettings,
    layout: &MissionLayout,
    log: &mut File,
    cumulative: &mut File,
    terminal: &mut dyn Write,
) -> Result<ExitStatus, LaunchError> {
    let (mut reader, writer) = io::pipe().map_err(LaunchError::Pipe)?;
    let writer_err = writer.try_clone().map_err(LaunchError::Pipe)?;

    let mut cmd = build_command(settings, &layout.output_dir);
    cmd.stdout(Stdio::from(writer)).stderr(Stdio::from(writer_err));
    let child = spawn(settings, &mut cmd)?;
    // Our copies of the write end must close or the read loop never sees EOF
    drop(cmd);

    let mut tee = Tee::new()
        .with("terminal", terminal)
        .with("mission log", log)
        .with("cumulative log", cumulative);
    let relayed = relay(&mut reader, &mut tee);
    drop(reader);

    // Reap the child even when relaying broke off
    let status = wait(settings, child)?;
    relayed.map_err(LaunchError::Relay)?;
    Ok(status)
}

fn relay(reader: &mut impl Read, tee: &mut Tee<'_>) -> io::Result<()> {
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        tee.write_all(&buf[..n])?;
        tee.flush()?;
    }
    Ok(())
}

fn announce(
    cumulative: &mut File,
    terminal: &mut dyn Write,
    clock: &dyn Clock,
    timezone: Timezone,
    event: &str,
    output_dir: &Path,
) -> Result<(), LaunchError> {
    let line = format!(
        "[{}] Mission {event}: {}\n",
        timezone.format(clock.now(), ANNOUNCE_FORMAT),
        output_dir.display()
    );
    cumulative
        .write_all(line.as_bytes())
        .map_err(LaunchError::Announce)?;
    let _ = terminal.write_all(line.as_bytes());
    let _ = terminal.flush();
    Ok(())
}

fn open_append(path: &Path) -> Result<File, LaunchError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LaunchError::OpenLog {
            path: path.to_path_buf(),
            source,
        })
}

/// Process exit code mirroring the controller's status.
///
/// Signal deaths map to 128 + signal, as a shell reports them.
pub(crate) fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return (code & 0xff) as u8;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return (128 + signal).clamp(0, 255) as u8;
        }
    }
    1
}
