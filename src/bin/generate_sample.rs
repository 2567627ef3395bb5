use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One generated row. Optional cells become nulls / blanks.
struct Row {
    batter_id: String,
    bowling_type: String,
    n_balls: Option<i64>,
    mean_residual: f64,
    std_residual: f64,
    se: f64,
    t_stat: Option<f64>,
}

/// Per-batter skill and per-ball residual noise, summarised the way the
/// upstream regression reports them.
fn generate_rows(rng: &mut SimpleRng, n_batters: usize) -> Vec<Row> {
    let mut rows = Vec::with_capacity(n_batters * 2 + 2);

    for i in 0..n_batters {
        let batter_id = format!("B{:04}", 1000 + i);
        let skill = rng.gauss(0.0, 0.12);

        for (bowling_type, bias) in [("Pace", 0.0), ("Spin", rng.gauss(0.0, 0.08))] {
            let n_balls = 20 + (rng.next_f64() * 1200.0) as i64;
            let std_residual = 1.1 + rng.next_f64() * 0.6;
            let se = std_residual / (n_balls as f64).sqrt();
            let mean_residual = skill + bias + rng.gauss(0.0, se);

            rows.push(Row {
                batter_id: batter_id.clone(),
                bowling_type: bowling_type.to_string(),
                n_balls: Some(n_balls),
                mean_residual,
                std_residual,
                se,
                t_stat: Some(mean_residual / se),
            });
        }
    }

    // Rows the loader must drop.
    rows.push(Row {
        batter_id: "B9998".into(),
        bowling_type: "Pace".into(),
        n_balls: Some(300),
        mean_residual: 0.2,
        std_residual: 1.2,
        se: 0.07,
        t_stat: None,
    });
    rows.push(Row {
        batter_id: "B9999".into(),
        bowling_type: "Unknown".into(),
        n_balls: None,
        mean_residual: 0.1,
        std_residual: 1.3,
        se: 0.09,
        t_stat: Some(1.1),
    });
    rows
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("BatterID", DataType::Utf8, false),
        Field::new("bowling_type", DataType::Utf8, false),
        Field::new("n_balls", DataType::Int64, true),
        Field::new("mean_residual", DataType::Float64, false),
        Field::new("std_residual", DataType::Float64, false),
        Field::new("se", DataType::Float64, false),
        Field::new("t_stat", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.batter_id.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.bowling_type.as_str()))),
            Arc::new(rows.iter().map(|r| r.n_balls).collect::<Int64Array>()),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.mean_residual))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.std_residual))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.se))),
            Arc::new(rows.iter().map(|r| r.t_stat).collect::<Float64Array>()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "BatterID",
        "bowling_type",
        "n_balls",
        "mean_residual",
        "std_residual",
        "se",
        "t_stat",
    ])?;
    for r in rows {
        writer.write_record([
            r.batter_id.clone(),
            r.bowling_type.clone(),
            r.n_balls.map(|v| v.to_string()).unwrap_or_default(),
            r.mean_residual.to_string(),
            r.std_residual.to_string(),
            r.se.to_string(),
            r.t_stat.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 400);

    write_parquet(&rows, "sample_batters.parquet")?;
    write_csv(&rows, "sample_batters.csv")?;

    println!(
        "Wrote {} rows to sample_batters.parquet and sample_batters.csv",
        rows.len()
    );
    Ok(())
}
