use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// CSF 2.0-style structure: functions, category codes, subcategory counts.
const STRUCTURE: &[(&str, &[(&str, usize)])] = &[
    (
        "GOVERN",
        &[
            ("GV.OC", 5),
            ("GV.RM", 7),
            ("GV.RR", 4),
            ("GV.PO", 2),
            ("GV.OV", 3),
            ("GV.SC", 10),
        ],
    ),
    ("IDENTIFY", &[("ID.AM", 6), ("ID.RA", 7), ("ID.IM", 2)]),
    (
        "PROTECT",
        &[
            ("PR.AA", 6),
            ("PR.AT", 5),
            ("PR.DS", 11),
            ("PR.PS", 6),
            ("PR.IR", 5),
        ],
    ),
    ("DETECT", &[("DE.CM", 3), ("DE.AE", 2)]),
    (
        "RESPOND",
        &[("RS.MA", 5), ("RS.AN", 5), ("RS.CO", 3), ("RS.MI", 2)],
    ),
    ("RECOVER", &[("RC.RP", 1), ("RC.CO", 3)]),
];

pub const SCALE_MIN: i64 = 0;
pub const SCALE_MAX: i64 = 6;

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub seed: u64,
    pub n_raters: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_raters: 6,
        }
    }
}

/// Writes a synthetic ratings CSV and returns the row count. Raters share a
/// per-row base maturity and differ by bounded noise, so the output has
/// meaningful (not pure-noise) inter-rater correlation. Fixed seed, fixed
/// output.
pub fn generate_csv(path: &Path, config: &SynthConfig) -> std::io::Result<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = String::new();

    out.push_str("Function,Category,Subcategory");
    for m in 1..=config.n_raters {
        out.push_str(&format!(",Manager_{m}"));
    }
    out.push('\n');

    let mut n_rows = 0usize;
    for (function, categories) in STRUCTURE {
        for (category, n_subcats) in *categories {
            for i in 1..=*n_subcats {
                out.push_str(&format!("{function},{category},{category}-{i:02}"));
                let base: i64 = rng.gen_range(0..6);
                for _ in 0..config.n_raters {
                    let noise: i64 = rng.gen_range(-2..2);
                    let rating = (base + noise).clamp(SCALE_MIN, SCALE_MAX);
                    out.push_str(&format!(",{rating}"));
                }
                out.push('\n');
                n_rows += 1;
            }
        }
    }

    fs::write(path, out)?;
    info!("generated {n_rows} synthetic rating rows at {}", path.display());
    Ok(n_rows)
}
