use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use lectern_cli::permissions::{build_report, print_report};
use lectern_cli::seeder::{self, SeedConfig};
use lectern_config::{PermissionsConfig, ServerConfig};
use lectern_db::{init_db_pool, run_migrations};
use lectern_rbac::{PermissionTable, TableSource};
use sqlx::PgPool;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern-cli")]
#[command(about = "Lectern CLI - Administrative tools for Lectern", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a permission table and print every decision it makes
    CheckPermissions {
        /// Table file (defaults to PERMISSIONS_PATH or config/permissions.json)
        #[arg(short = 'p', long)]
        path: Option<PathBuf>,
    },
    /// Seed the database with fake teachers, students, courses and assignments
    Seed {
        /// Number of teachers to create
        #[arg(long, default_value = "5")]
        teachers: usize,

        /// Number of students to create
        #[arg(long, default_value = "100")]
        students: usize,

        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "10")]
        courses: usize,

        /// Number of assignments per course
        #[arg(long, default_value = "3")]
        assignments: usize,

        /// Probability that a student is enrolled in a given course
        #[arg(long, default_value = "0.3")]
        enrollment_rate: f64,
    },
    /// Delete all seeded accounts and everything they own
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CheckPermissions { path } => handle_check_permissions(path),
        Commands::Seed {
            teachers,
            students,
            courses,
            assignments,
            enrollment_rate,
        } => {
            let config = SeedConfig::new(teachers, students, courses)
                .with_assignments(assignments)
                .with_enrollment_rate(enrollment_rate);
            let pool = connect().await?;
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => {
            let pool = connect().await?;
            seeder::clear_seed(&pool).await?;
            Ok(())
        }
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = ServerConfig::from_env()
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let pool = init_db_pool(&database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn handle_check_permissions(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| PermissionsConfig::from_env().path);

    let (table, source) = match PermissionTable::load_or_builtin(&path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Invalid permission table {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    match source {
        TableSource::File(path) => println!("📄 Loaded {}\n", path.display()),
        TableSource::Builtin => println!(
            "📄 {} not found, showing the built-in table\n",
            path.display()
        ),
    }

    let report = build_report(&table);
    print_report(&report);

    if !report.is_consistent() {
        std::process::exit(2);
    }
    println!("\n✅ Every module configures every role");
    Ok(())
}
