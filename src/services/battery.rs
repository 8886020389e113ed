use std::path::Path;

use tracing::debug;

use crate::kernel::collaborators::BatteryStatus;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Current battery state, `None` when the platform exposes no battery.
pub async fn battery_status() -> Option<BatteryStatus> {
    if cfg!(target_os = "linux") {
        read_sysfs(Path::new(POWER_SUPPLY_DIR)).await
    } else if cfg!(target_os = "macos") {
        let output = tokio::process::Command::new("pmset").args(["-g", "batt"]).output().await.ok()?;
        parse_pmset(&String::from_utf8_lossy(&output.stdout))
    } else {
        debug!("Battery status not supported on this platform");
        None
    }
}

/// Reads the first `BAT*` supply under `dir`.
pub async fn read_sysfs(dir: &Path) -> Option<BatteryStatus> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let base = entry.path();
        let capacity = tokio::fs::read_to_string(base.join("capacity")).await.ok()?;
        let status = tokio::fs::read_to_string(base.join("status")).await.unwrap_or_default();
        let percent = capacity.trim().parse::<u8>().ok()?;
        return Some(BatteryStatus {
            percent: percent.min(100),
            plugged: !status.trim().eq_ignore_ascii_case("discharging"),
        });
    }
    None
}

/// Parses `pmset -g batt`, e.g. `Now drawing from 'AC Power'` /
/// `-InternalBattery-0 (id=1)\t87%; charging; ...`.
pub fn parse_pmset(output: &str) -> Option<BatteryStatus> {
    let percent_at = output.find('%')?;
    let digits: String = output[..percent_at]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let percent = digits.parse::<u8>().ok()?;
    Some(BatteryStatus {
        percent: percent.min(100),
        plugged: output.contains("'AC Power'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pmset_on_battery() {
        let out = "Now drawing from 'Battery Power'\n -InternalBattery-0 (id=123)\t64%; discharging; 3:10 remaining present: true\n";
        assert_eq!(parse_pmset(out), Some(BatteryStatus { percent: 64, plugged: false }));
    }

    #[test]
    fn parses_pmset_on_ac() {
        let out = "Now drawing from 'AC Power'\n -InternalBattery-0 (id=123)\t100%; charged; 0:00 remaining\n";
        assert_eq!(parse_pmset(out), Some(BatteryStatus { percent: 100, plugged: true }));
    }

    #[test]
    fn desktop_without_battery() {
        assert_eq!(parse_pmset("Now drawing from 'AC Power'\n"), None);
    }

    #[tokio::test]
    async fn reads_sysfs_battery() {
        let dir = tempfile::tempdir().unwrap();
        let bat = dir.path().join("BAT0");
        std::fs::create_dir(&bat).unwrap();
        std::fs::write(bat.join("capacity"), "42\n").unwrap();
        std::fs::write(bat.join("status"), "Discharging\n").unwrap();
        std::fs::create_dir(dir.path().join("AC")).unwrap();

        assert_eq!(read_sysfs(dir.path()).await, Some(BatteryStatus { percent: 42, plugged: false }));
    }

    #[tokio::test]
    async fn sysfs_without_battery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("AC")).unwrap();
        assert_eq!(read_sysfs(dir.path()).await, None);
    }
}
