use anyhow::{Context, Result};

const GENRES: [(&str, f64); 8] = [
    ("Боевик", 180.0),
    ("Приключения", 210.0),
    ("Военные", 60.0),
    ("Комедия", 90.0),
    ("Драма", 70.0),
    ("Хоррор", 45.0),
    ("Мультфильм", 150.0),
    ("Мюзикл", 30.0),
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_movies.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["title", "genre", "year", "gross", "rating"])?;

    let mut rows = 0;
    for year in 1986..=2016 {
        // Later years release more films and earn more per film.
        let releases = 4 + (year - 1986) / 5;
        let growth = 1.0 + (year - 1986) as f64 * 0.04;

        for n in 0..releases {
            let (genre, base) = GENRES[rng.below(GENRES.len())];
            let gross = (base * growth * (0.3 + 1.4 * rng.next_f64()) * 1e6).round();
            let rating = (40.0 + 50.0 * rng.next_f64()).round() / 10.0;

            writer.write_record([
                format!("Film {year}-{:02}", n + 1),
                genre.to_string(),
                year.to_string(),
                format!("{gross:.0}"),
                format!("{rating:.1}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV output")?;

    println!("Wrote {rows} movies (1986–2016) to {output_path}");
    Ok(())
}
