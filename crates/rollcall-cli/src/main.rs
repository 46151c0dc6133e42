use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use rollcall_cli::seeder::{self, SeedConfig, StreamsPerTeacher};
use rollcall_config::DatabaseConfig;
use rollcall_core::hash_password;
use rollcall_db::{PgPool, init_db_pool, run_migrations};
use rollcall_models::{RegisterStudentDto, RegisterTeacherDto, UserRole};
use uuid::Uuid;
use validator::Validate;

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Administrative tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a teacher account
    CreateTeacher {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'm', long)]
        mobile_number: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create a student account
    CreateStudent {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'r', long)]
        registration_number: Option<String>,

        #[arg(short = 'm', long)]
        mobile_number: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with teachers, streams, students and attendance
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "3")]
        teachers: usize,

        /// Streams per teacher
        #[arg(long, default_value = "2")]
        streams: usize,

        /// Subjects per stream
        #[arg(long, default_value = "4")]
        subjects: usize,

        /// Students per stream
        #[arg(long, default_value = "20")]
        students: usize,

        /// Weekdays of attendance history
        #[arg(long, default_value = "20")]
        days: usize,
    },
    /// Delete every seeded account and its data
    Clear,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let mut config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    config.max_connections = 5;

    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    match command {
        Commands::Migrate => {
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("✅ Migrations applied");
        }
        Commands::CreateTeacher {
            name,
            email,
            mobile_number,
            password,
        } => {
            let dto = RegisterTeacherDto {
                name: prompt_or(name, "Full name")?,
                email: prompt_or(email, "Email address")?,
                mobile_number: prompt_or(mobile_number, "Mobile number")?,
                password: password_or_prompt(password)?,
            };
            dto.validate()?;
            let id = create_account(
                &pool,
                UserRole::Teacher,
                &dto.name,
                &dto.email,
                &dto.password,
                &dto.mobile_number,
                None,
            )
            .await?;
            println!("\n✅ Teacher created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", dto.email);
        }
        Commands::CreateStudent {
            name,
            email,
            registration_number,
            mobile_number,
            password,
        } => {
            let dto = RegisterStudentDto {
                name: prompt_or(name, "Full name")?,
                email: prompt_or(email, "Email address")?,
                registration_number: prompt_or(registration_number, "Registration number")?,
                mobile_number: prompt_or(mobile_number, "Mobile number")?,
                password: password_or_prompt(password)?,
            };
            dto.validate()?;
            let id = create_account(
                &pool,
                UserRole::Student,
                &dto.name,
                &dto.email,
                &dto.password,
                &dto.mobile_number,
                Some(&dto.registration_number),
            )
            .await?;
            println!("\n✅ Student created successfully!");
            println!("   ID: {}", id);
            println!("   Registration number: {}", dto.registration_number);
        }
        Commands::Seed {
            teachers,
            streams,
            subjects,
            students,
            days,
        } => {
            let config = SeedConfig::new(teachers)
                .with_streams(StreamsPerTeacher {
                    count: streams,
                    subjects_per_stream: subjects,
                    students_per_stream: students,
                })
                .with_attendance_days(days);
            seeder::seed_all(&pool, config).await?;
        }
        Commands::Clear => seeder::clear_all(&pool).await?,
    }

    Ok(())
}

fn prompt_or(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn password_or_prompt(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password"),
    }
}

async fn create_account(
    db: &PgPool,
    role: UserRole,
    name: &str,
    email: &str,
    password: &str,
    mobile_number: &str,
    registration_number: Option<&str>,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow!(e.message()))?;

    let mut tx = db.begin().await?;

    let user_id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO users (name, email, password, role)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(name.trim())
    .bind(email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&mut *tx)
    .await
    .context("Failed to create user (is the email already registered?)")?;

    match registration_number {
        Some(number) => {
            sqlx::query(
                "INSERT INTO students (user_id, registration_number, mobile_number) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(number.trim())
            .bind(mobile_number.trim())
            .execute(&mut *tx)
            .await
            .context("Failed to create student (is the registration number taken?)")?;
        }
        None => {
            sqlx::query("INSERT INTO teachers (user_id, mobile_number) VALUES ($1, $2)")
                .bind(user_id)
                .bind(mobile_number.trim())
                .execute(&mut *tx)
                .await
                .context("Failed to create teacher")?;
        }
    }

    tx.commit().await?;
    Ok(user_id)
}
