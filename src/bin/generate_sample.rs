//! Write a synthetic `spotify_data.csv` (and a Parquet twin) with the
//! column layout the dashboard expects.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Artist name and a popularity factor scaling their audience numbers.
const ARTISTS: [(&str, f64); 8] = [
    ("Gorillaz", 1.0),
    ("Red Hot Chili Peppers", 1.4),
    ("Dua Lipa", 2.2),
    ("Bad Bunny", 2.8),
    ("Daft Punk", 1.1),
    ("Metallica", 0.9),
    ("Norah Jones", 0.4),
    ("Tame Impala", 0.6),
];
const TRACKS_PER_ARTIST: usize = 10;
const ALBUM_TYPES: [&str; 3] = ["album", "single", "compilation"];

#[derive(Default)]
struct Columns {
    artist: Vec<String>,
    track: Vec<String>,
    album_type: Vec<String>,
    danceability: Vec<f64>,
    energy: Vec<f64>,
    loudness: Vec<f64>,
    tempo: Vec<f64>,
    duration_ms: Vec<i64>,
    views: Vec<i64>,
    likes: Vec<i64>,
    comments: Vec<i64>,
    licensed: Vec<bool>,
    stream: Vec<Option<i64>>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut c = Columns::default();
    for (artist, popularity) in ARTISTS {
        for t in 0..TRACKS_PER_ARTIST {
            let energy = rng.uniform(0.2, 1.0);
            let hype = popularity * rng.gauss(1.0, 0.35).abs();
            let stream = (hype * 4.0e8) as i64;
            let views = (hype * rng.uniform(1.5e8, 3.0e8)) as i64;
            // Likes track views, which is what the heatmap should show.
            let likes = (views as f64 * rng.uniform(0.006, 0.012)) as i64;

            c.artist.push(artist.to_string());
            c.track.push(format!("{artist} Track {}", t + 1));
            c.album_type.push(ALBUM_TYPES[(rng.next_u64() % 3) as usize].to_string());
            c.danceability.push(rng.uniform(0.3, 0.95));
            c.energy.push(energy);
            c.loudness.push(-14.0 + 10.0 * energy + rng.gauss(0.0, 1.0));
            c.tempo.push(rng.uniform(70.0, 180.0));
            c.duration_ms.push(rng.uniform(150_000.0, 320_000.0) as i64);
            c.views.push(views);
            c.likes.push(likes);
            c.comments.push((likes as f64 * rng.uniform(0.01, 0.05)) as i64);
            c.licensed.push(rng.next_f64() < 0.7);
            // The real dataset has a few tracks without a Spotify match.
            c.stream.push((rng.next_f64() >= 0.03).then_some(stream));
        }
    }
    c
}

fn write_csv(path: &str, c: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "Artist",
        "Track",
        "Album_type",
        "Danceability",
        "Energy",
        "Loudness",
        "Tempo",
        "Duration_ms",
        "Views",
        "Likes",
        "Comments",
        "Licensed",
        "Stream",
    ])?;
    for i in 0..c.artist.len() {
        writer.write_record([
            c.artist[i].clone(),
            c.track[i].clone(),
            c.album_type[i].clone(),
            format!("{:.3}", c.danceability[i]),
            format!("{:.3}", c.energy[i]),
            format!("{:.3}", c.loudness[i]),
            format!("{:.3}", c.tempo[i]),
            c.duration_ms[i].to_string(),
            c.views[i].to_string(),
            c.likes[i].to_string(),
            c.comments[i].to_string(),
            if c.licensed[i] { "True" } else { "False" }.to_string(),
            c.stream[i].map(|s| s.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn to_batch(c: &Columns) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Artist", DataType::Utf8, false),
        Field::new("Track", DataType::Utf8, false),
        Field::new("Album_type", DataType::Utf8, false),
        Field::new("Danceability", DataType::Float64, false),
        Field::new("Energy", DataType::Float64, false),
        Field::new("Loudness", DataType::Float64, false),
        Field::new("Tempo", DataType::Float64, false),
        Field::new("Duration_ms", DataType::Int64, false),
        Field::new("Views", DataType::Int64, false),
        Field::new("Likes", DataType::Int64, false),
        Field::new("Comments", DataType::Int64, false),
        Field::new("Licensed", DataType::Boolean, false),
        Field::new("Stream", DataType::Int64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(c.artist.clone())),
        Arc::new(StringArray::from(c.track.clone())),
        Arc::new(StringArray::from(c.album_type.clone())),
        Arc::new(Float64Array::from(c.danceability.clone())),
        Arc::new(Float64Array::from(c.energy.clone())),
        Arc::new(Float64Array::from(c.loudness.clone())),
        Arc::new(Float64Array::from(c.tempo.clone())),
        Arc::new(Int64Array::from(c.duration_ms.clone())),
        Arc::new(Int64Array::from(c.views.clone())),
        Arc::new(Int64Array::from(c.likes.clone())),
        Arc::new(Int64Array::from(c.comments.clone())),
        Arc::new(BooleanArray::from(c.licensed.clone())),
        Arc::new(Int64Array::from(c.stream.clone())),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_parquet(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let columns = generate(&mut rng);

    let csv_path = "spotify_data.csv";
    write_csv(csv_path, &columns)?;

    let batch = to_batch(&columns)?;
    let parquet_path = "spotify_data.parquet";
    write_parquet(parquet_path, &batch)?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!(
        "Wrote {} tracks by {} artists to {csv_path} and {parquet_path}",
        columns.artist.len(),
        ARTISTS.len()
    );
    Ok(())
}
