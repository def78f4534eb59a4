//! 処理中の経過時間表示

/// 経過時間ラベルの更新間隔（ミリ秒）
pub const TICK_INTERVAL_MS: u32 = 1_000;

/// 送信開始時刻からの経過時間
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedClock {
    started_at_ms: f64,
}

impl ElapsedClock {
    /// `now_ms` は `Date.now()` と同じエポックミリ秒
    pub fn start(now_ms: f64) -> Self {
        Self {
            started_at_ms: now_ms,
        }
    }

    /// 経過秒数（切り捨て、時計が戻った場合は0）
    pub fn elapsed_seconds(&self, now_ms: f64) -> u64 {
        let elapsed = now_ms - self.started_at_ms;
        if elapsed.is_finite() && elapsed > 0.0 {
            (elapsed / 1000.0).floor() as u64
        } else {
            0
        }
    }

    pub fn label(&self, now_ms: f64) -> String {
        seconds_label(self.elapsed_seconds(now_ms))
    }
}

/// "N seconds" 形式のラベル
pub fn seconds_label(seconds: u64) -> String {
    format!("{} seconds", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_label() {
        let clock = ElapsedClock::start(1_700_000_000_000.0);
        assert_eq!(clock.label(1_700_000_000_000.0), "0 seconds");
    }

    #[test]
    fn test_floor() {
        let clock = ElapsedClock::start(10_000.0);
        assert_eq!(clock.elapsed_seconds(10_999.0), 0);
        assert_eq!(clock.elapsed_seconds(11_000.0), 1);
        assert_eq!(clock.label(72_500.0), "62 seconds");
    }

    #[test]
    fn test_clock_going_backwards() {
        let clock = ElapsedClock::start(10_000.0);
        assert_eq!(clock.elapsed_seconds(9_000.0), 0);
        assert_eq!(clock.elapsed_seconds(f64::NAN), 0);
    }
}
