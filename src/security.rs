//! Store security: catch probability, chases, and theft bookkeeping.

/// Level words and the numeric 0-100 form both land in [0, 1].
pub fn parse_level(text: &str) -> Option<f32> {
    match text {
        "low" => Some(0.3),
        "medium" => Some(0.5),
        "high" => Some(0.7),
        "paranoid" => Some(0.95),
        other => {
            let value: f32 = other.parse().ok()?;
            (0.0..=100.0).contains(&value).then(|| value / 100.0)
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TheftStats {
    pub attempts: u32,
    pub successful: u32,
    pub caught: u32,
}

#[derive(Debug)]
pub struct SecurityState {
    /// Probability that an attempt gets caught.
    pub level: f32,
    pub chase: bool,
    pub stats: TheftStats,
}

impl Default for SecurityState {
    fn default() -> Self {
        SecurityState {
            level: 0.5,
            chase: false,
            stats: TheftStats::default(),
        }
    }
}

impl SecurityState {
    pub fn new() -> Self {
        SecurityState::default()
    }

    pub fn set_level(&mut self, level: f32) -> String {
        self.level = level.clamp(0.0, 1.0);
        let flavor = if self.level < 0.4 {
            "the guard is half asleep."
        } else if self.level < 0.6 {
            "cameras sweep the aisles."
        } else if self.level < 0.9 {
            "undercover officers among the shoppers."
        } else {
            "they are watching everyone."
        };
        format!(
            "👮 Security level set to {:.0}% - {}",
            self.level * 100.0,
            flavor
        )
    }

    /// Resolve one theft attempt with an already-rolled chance in [0, 1).
    /// Returns whether the shopper escaped.
    pub fn attempt(&mut self, roll: f32) -> bool {
        self.stats.attempts += 1;
        let escaped = roll >= self.level;
        if escaped {
            self.stats.successful += 1;
        } else {
            self.stats.caught += 1;
        }
        escaped
    }

    pub fn stats_lines(&self) -> Vec<String> {
        vec![
            "🚨 SHOPLIFTING STATISTICS:".to_string(),
            format!("Total Attempts: {}", self.stats.attempts),
            format!("Successful Escapes: {}", self.stats.successful),
            format!("Caught by Security: {}", self.stats.caught),
            format!("Security Level: {:.0}%", self.level * 100.0),
        ]
    }
}
