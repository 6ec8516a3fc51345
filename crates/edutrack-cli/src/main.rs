use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edutrack_cli::seeder::{self, SeedConfig, StaffPerCollege};
use edutrack_config::DatabaseConfig;
use edutrack_db::init_db_pool;
use edutrack_db::seed::{create_superadmin, seed_default_classes};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "edutrack-cli")]
#[command(about = "EduTrack CLI - Administrative tools for EduTrack", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a superadmin account
    CreateSuperadmin {
        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Insert the default classes "1" to "12" if the table is empty
    SeedClasses,
    /// Seed the database with fake colleges, staff and students
    Seed {
        /// Number of colleges to create
        #[arg(short = 'c', long, default_value = "5")]
        colleges: usize,

        /// Number of admins per college
        #[arg(long, default_value = "2")]
        admins: usize,

        /// Number of teachers per college
        #[arg(long, default_value = "5")]
        teachers: usize,

        /// Number of students per college
        #[arg(long, default_value = "100")]
        students: usize,

        /// Password shared by every seeded account
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Seed staff for seeded colleges that already exist
    SeedStaff {
        #[arg(long, default_value = "2")]
        admins: usize,

        #[arg(long, default_value = "5")]
        teachers: usize,

        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Seed students for seeded colleges that already exist
    SeedStudents {
        #[arg(long, default_value = "100")]
        students: usize,

        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Clear all seeded data (keeps superadmins and real colleges)
    ClearSeed,
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

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env()?;
    init_db_pool(&config).await
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let pool = connect().await?;

    match command {
        Commands::CreateSuperadmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_superadmin(&pool, first_name, last_name, email, password).await,
        Commands::SeedClasses => {
            let inserted = seed_default_classes(&pool).await?;
            println!("✅ Inserted {} classes", inserted);
            Ok(())
        }
        Commands::Seed {
            colleges,
            admins,
            teachers,
            students,
            password,
        } => {
            let config = SeedConfig::new(colleges)
                .with_staff(StaffPerCollege { admins, teachers })
                .with_students(students);
            seeder::seed_all(&pool, config, &password).await
        }
        Commands::SeedStaff {
            admins,
            teachers,
            password,
        } => {
            let college_ids = existing_seeded_colleges(&pool).await?;
            let hash = edutrack_core::hash_password(&password).map_err(|e| e.error)?;
            let created = seeder::seed_staff(&pool, &college_ids, admins, teachers, &hash).await?;
            println!("✅ Created {} staff accounts", created);
            Ok(())
        }
        Commands::SeedStudents { students, password } => {
            let college_ids = existing_seeded_colleges(&pool).await?;
            seed_default_classes(&pool).await?;
            let hash = edutrack_core::hash_password(&password).map_err(|e| e.error)?;
            let created = seeder::seed_students(&pool, &college_ids, students, &hash).await?;
            println!("✅ Created {} students", created);
            Ok(())
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn existing_seeded_colleges(pool: &PgPool) -> anyhow::Result<Vec<uuid::Uuid>> {
    let ids = seeder::seeded_college_ids(pool).await?;
    if ids.is_empty() {
        anyhow::bail!("No seeded colleges found. Run `seed` first.");
    }
    Ok(ids)
}

async fn handle_create_superadmin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = match first_name {
        Some(v) => v,
        None => Input::new()
            .with_prompt("First name")
            .interact_text()
            .context("Failed to read first name")?,
    };

    let last_name = match last_name {
        Some(v) => v,
        None => Input::new()
            .with_prompt("Last name")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read last name")?,
    };

    let email = match email {
        Some(v) => v,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(v) => v,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let last_name = Some(last_name.trim()).filter(|l| !l.is_empty());
    create_superadmin(pool, &email, &password, &first_name, last_name).await?;

    println!("\n✅ Superadmin created successfully!");
    println!("   Email: {}", email.trim().to_lowercase());
    println!("   Name: {} {}", first_name, last_name.unwrap_or_default());
    Ok(())
}
