//! Process-based probes
//!
//! Service-specific liveness checks that shell out to the vendor CLI. Each
//! invocation is bounded by a timeout and the child is killed when the
//! timeout fires.

use std::process::Stdio;
use std::time::Duration;

use svcwatch_common::config::ProbeConfig;
use tokio::process::Command;
use tracing::debug;

use super::ProbeError;

pub const REDIS_PING_SUCCESSFUL: &str = "Redis PING successful";
pub const CLUSTER_ACCESSIBLE: &str = "Cluster accessible";
pub const ETCD_ENDPOINT_HEALTHY: &str = "etcd endpoint healthy";

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program args...` and require a zero exit status
pub async fn run(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CommandOutput, ProbeError> {
    debug!("Running probe command: {} {}", program, args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Err(_) => {
            return Err(ProbeError::Timeout {
                target: program.to_string(),
                after: timeout,
            });
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProbeError::ToolUnavailable {
                program: program.to_string(),
            });
        }
        Ok(Err(source)) => {
            return Err(ProbeError::Spawn {
                program: program.to_string(),
                source,
            });
        }
        Ok(Ok(output)) => output,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

/// `redis-cli -h HOST -p PORT PING`, expecting the configured reply
pub async fn redis_ping(config: &ProbeConfig, host: &str, port: u16) -> Result<(), ProbeError> {
    let args = vec![
        "-h".to_string(),
        host.to_string(),
        "-p".to_string(),
        port.to_string(),
        "PING".to_string(),
    ];
    let output = run(&config.redis_cli, &args, config.command_timeout()).await?;

    let reply = output.stdout.trim();
    if reply == config.redis_expected_reply {
        Ok(())
    } else {
        Err(ProbeError::UnexpectedReply {
            program: config.redis_cli.clone(),
            reply: reply.to_string(),
        })
    }
}

/// `rpk cluster info --brokers HOST:PORT`
pub async fn cluster_info(config: &ProbeConfig, host: &str, port: u16) -> Result<(), ProbeError> {
    let args = vec![
        "cluster".to_string(),
        "info".to_string(),
        "--brokers".to_string(),
        format!("{host}:{port}"),
    ];
    run(&config.rpk, &args, config.cluster_timeout()).await?;
    Ok(())
}

/// `etcdctl endpoint health --endpoints=HOST:PORT`
pub async fn etcd_endpoint_health(
    config: &ProbeConfig,
    host: &str,
    port: u16,
) -> Result<(), ProbeError> {
    let args = vec![
        "endpoint".to_string(),
        "health".to_string(),
        format!("--endpoints={host}:{port}"),
    ];
    run(&config.etcdctl, &args, config.command_timeout()).await?;
    Ok(())
}
