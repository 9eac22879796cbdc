use clap::{Parser, Subcommand};
use fdq_client::{backend_for, Backend, LocalSimulator};
use fdq_core::projection::{self, CardView, ChartPoint, TableView};
use fdq_core::records::ResultSet;
use fdq_core::session::QueryOutcome;
use fdq_core::{ClientConfig, FilterCriteria};
use fdq_types::QueryText;

#[derive(Parser)]
#[command(name = "fdq")]
#[command(about = "Clinical data query client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the answer, table, and chart
    Query {
        /// Free-text question about patients, observations, or conditions
        text: String,
        /// Keep only patients with this exact gender
        #[arg(long)]
        gender: Option<String>,
        /// Keep only patients in this age range ("30-39", or "50" open-ended)
        #[arg(long)]
        age_range: Option<String>,
        /// Keep only conditions with this exact severity
        #[arg(long)]
        severity: Option<String>,
        /// Keep only conditions whose code contains this text
        #[arg(long)]
        code: Option<String>,
        /// Dispatch to the configured remote backend instead of the simulator
        #[arg(long)]
        remote: bool,
        /// Print the backend-generated retrieval code (remote answers only)
        #[arg(long)]
        show_code: bool,
    },
    /// List the simulator's built-in records
    Dataset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            text,
            gender,
            age_range,
            severity,
            code,
            remote,
            show_code,
        } => {
            let mode = if remote {
                Some("remote".to_string())
            } else {
                std::env::var("FDQ_BACKEND").ok()
            };
            let config =
                ClientConfig::from_env_values(mode, std::env::var("FDQ_API_URL").ok())?;

            // One-shot runs skip the pacing delay the interactive screen uses.
            let backend: Box<dyn Backend> = match config.mode() {
                fdq_core::BackendMode::Local => Box::new(LocalSimulator::unpaced()),
                fdq_core::BackendMode::Remote => backend_for(&config)?,
            };

            let query = QueryText::new(&text)?;
            let criteria = FilterCriteria {
                age_range,
                gender,
                severity,
                code,
            };

            match backend.dispatch(&query).await? {
                QueryOutcome::Simulated(set) => print_simulated(&set, &criteria),
                QueryOutcome::Api(envelope) => print_envelope(&envelope, show_code),
            }
        }
        Commands::Dataset => {
            println!("Patients");
            print_table(&projection::table(&ResultSet::Patients(
                fdq_core::dataset::patients(),
            )));
            println!("\nObservations");
            print_table(&projection::table(&ResultSet::Observations(
                fdq_core::dataset::observations(),
            )));
            println!("\nConditions");
            print_table(&projection::table(&ResultSet::Conditions(
                fdq_core::dataset::conditions(),
            )));
        }
    }

    Ok(())
}

fn print_simulated(set: &ResultSet, criteria: &FilterCriteria) {
    let visible = fdq_core::filter::apply(set, criteria);
    if visible.is_empty() {
        println!("No results found.");
        return;
    }

    println!("{} records · {}", visible.len(), visible.kind());
    println!();
    print_table(&projection::table(&visible));

    let points = projection::chart(&visible);
    if !points.is_empty() {
        println!();
        print_chart(&points);
    }
}

fn print_envelope(envelope: &fdq_core::ApiEnvelope, show_code: bool) {
    println!("{}", envelope.natural_language_response);
    println!(
        "{:.2}s · {} records",
        envelope.execution_time,
        envelope.data.count.unwrap_or(0)
    );

    if show_code && !envelope.generated_code.is_empty() {
        println!("\nGenerated code:\n{}", envelope.generated_code);
    }

    if let Some(table) = &envelope.data.table {
        if table.rows.is_empty() {
            println!("\nNo data available");
        } else {
            println!();
            print_table(&projection::table_from_api(table));
        }
    } else if let Ok(set) = ResultSet::from_untagged(&envelope.result) {
        // No server table, but raw records we can classify and project.
        println!();
        print_table(&projection::table(&set));
    }

    if let Some(chart) = &envelope.data.chart {
        let points = projection::chart_from_api(chart);
        if !points.is_empty() {
            println!();
            print_chart(&points);
        }
    }

    if let Some(cards) = &envelope.data.cards {
        let views = projection::cards_from_api(cards);
        if !views.is_empty() {
            println!();
            print_cards(&views);
        }
    }
}

fn print_table(view: &TableView) {
    let mut widths: Vec<usize> = view.columns.iter().map(String::len).collect();
    for row in &view.rows {
        for (idx, cell) in row.iter().enumerate() {
            if cell.len() > widths[idx] {
                widths[idx] = cell.len();
            }
        }
    }

    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, &w)| format!("{col:<w$}"))
        .collect();
    println!("{}", header.join("  "));

    for row in &view.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        println!("{}", cells.join("  "));
    }
}

fn print_chart(points: &[ChartPoint]) {
    let width = points.iter().map(|p| p.label.len()).max().unwrap_or(0);
    for point in points {
        if point.value.fract() == 0.0 {
            println!("{:<width$}  {}", point.label, point.value as i64);
        } else {
            println!("{:<width$}  {}", point.label, point.value);
        }
    }
}

fn print_cards(cards: &[CardView]) {
    for card in cards {
        match &card.badge {
            Some(badge) => println!("{} [{badge}]", card.label),
            None => println!("{}", card.label),
        }
        for (key, value) in &card.lines {
            println!("  {key}: {value}");
        }
        if let Some(text) = &card.text {
            println!("  {text}");
        }
    }
}
