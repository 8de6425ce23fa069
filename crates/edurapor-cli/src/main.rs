use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use uuid::Uuid;

use edurapor_auth::{Role, create_access_token};
use edurapor_cli::seeder::{self, SeedConfig};
use edurapor_config::{DatabaseConfig, JwtConfig};
use edurapor_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "edurapor-cli")]
#[command(about = "edurapor CLI - Administrative tools for edurapor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Seed a demo school year with homeroom classes, students and records
    SeedDemo {
        /// Start year of the seeded academic year
        #[arg(short = 'y', long, default_value = "2024")]
        year: i32,

        /// Number of classes per program and grade
        #[arg(short = 'c', long, default_value = "2")]
        classes: usize,

        /// Number of students per class
        #[arg(short = 's', long, default_value = "20")]
        students: usize,

        /// Share of students left with incomplete records
        #[arg(long, default_value = "0.1")]
        incomplete_ratio: f64,
    },
    /// Delete all school data
    ClearSeed {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List homeroom teachers of the active academic year
    ListHomerooms,
    /// Issue an access token for local testing
    IssueToken {
        /// Teacher ID to put in the `sub` claim; looked up by email when omitted
        #[arg(short = 't', long)]
        teacher_id: Option<Uuid>,

        /// Email address for the token
        #[arg(short = 'e', long)]
        email: String,

        /// Role: admin, tutor, homeroom or student
        #[arg(short = 'r', long, default_value = "homeroom")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
        }
        Commands::SeedDemo {
            year,
            classes,
            students,
            incomplete_ratio,
        } => {
            let config = SeedConfig::new(year)
                .with_classes(classes)
                .with_students(students)
                .with_incomplete_ratio(incomplete_ratio);
            let summary = seeder::seed_demo(&pool, config).await?;
            println!(
                "   {} students ({} incomplete), {} homeroom teachers",
                summary.students,
                summary.incomplete_students,
                summary.homerooms.len()
            );
            println!("   Run `edurapor-cli list-homerooms` to pick a teacher to log in as");
        }
        Commands::ClearSeed { yes } => handle_clear_seed(&pool, yes).await?,
        Commands::ListHomerooms => {
            let rows = seeder::list_homerooms(&pool).await?;
            if rows.is_empty() {
                println!("No homeroom classes in the active academic year");
            }
            for row in rows {
                println!(
                    "{:<12} {} <{}> {}",
                    row.nama_kelas, row.name, row.email, row.teacher_id
                );
            }
        }
        Commands::IssueToken {
            teacher_id,
            email,
            role,
        } => handle_issue_token(&pool, teacher_id, &email, role).await?,
    }

    Ok(())
}

async fn handle_clear_seed(pool: &PgPool, yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("This deletes all students, classes and academic years. Continue?")
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    seeder::clear_all(pool).await?;
    Ok(())
}

async fn handle_issue_token(
    pool: &PgPool,
    teacher_id: Option<Uuid>,
    email: &str,
    role: Role,
) -> anyhow::Result<()> {
    let teacher_id = match teacher_id {
        Some(id) => id,
        None => sqlx::query_scalar::<_, Uuid>("SELECT id FROM teachers WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| anyhow!("No teacher with email {email}"))?,
    };

    let jwt_config = JwtConfig::from_env();
    let token = create_access_token(teacher_id, email, role, &jwt_config)
        .map_err(|e| anyhow!(e.message()))?;

    println!("{token}");
    Ok(())
}
