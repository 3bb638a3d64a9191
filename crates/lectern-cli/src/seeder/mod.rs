//! Database seeding for development and load testing.
//!
//! Users are generated in parallel with Rayon, enrollments are drawn with
//! `rand`, and everything is written with batched multi-row inserts.

pub mod courses;
pub mod models;
pub mod users;

pub use models::SeedConfig;

use lectern_core::hash_password;
use lectern_models::Role;
use sqlx::PgPool;
use std::time::Instant;

/// Seeds teachers, students, courses, enrollments and assignments.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} users and {} courses...\n",
        config.total_users(),
        config.courses
    );

    // One hash for every account; bcrypt per user would dominate the run.
    let password_hash = hash_password(&config.password).map_err(|e| e.error)?;

    let teacher_ids = users::seed_users(db, Role::Teacher, config.teachers, &password_hash).await?;
    let student_ids = users::seed_users(db, Role::Student, config.students, &password_hash).await?;

    if teacher_ids.is_empty() {
        println!("⚠️  No teachers seeded, skipping courses");
        return Ok(());
    }

    let course_ids = courses::seed_courses(db, &teacher_ids, config.courses).await?;

    let (enrollments, assignments) = {
        let mut rng = rand::thread_rng();
        (
            courses::plan_enrollments(&mut rng, &course_ids, &student_ids, config.enrollment_rate),
            courses::generate_assignments(&mut rng, &course_ids, config.assignments_per_course),
        )
    };
    courses::seed_enrollments(db, &enrollments).await?;
    courses::seed_assignments(db, &assignments).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Every seeded account uses the password '{}'", config.password);
    Ok(())
}

/// Removes everything `seed_all` created.
pub async fn clear_seed(db: &PgPool) -> anyhow::Result<u64> {
    users::clear_users(db).await
}
