use std::path::PathBuf;

/// Get snapshot output directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("CARDCAP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Round to 2 decimal places (cents)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.404), 10.4);
        assert_eq!(round2(1.239), 1.24);
        assert_eq!(round2(11440.000000000002), 11440.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
