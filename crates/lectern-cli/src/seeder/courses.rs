//! Course, enrollment and assignment seeding.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use lectern_models::{CourseId, DEFAULT_MAX_SCORE, UserId};
use rand::Rng;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{AssignmentSeed, CourseSeed};

/// Generates courses, spreading them over the teachers round-robin
pub fn generate_courses(teacher_ids: &[UserId], count: usize) -> Vec<CourseSeed> {
    if teacher_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let words: Vec<String> = Words(2..4).fake();
            let subject = words.join(" ");

            CourseSeed {
                title: format!("Introduction to {subject}"),
                description: Sentence(6..12).fake(),
                content: Paragraph(2..4).fake(),
                teacher_id: teacher_ids[idx % teacher_ids.len()],
            }
        })
        .collect()
}

/// Picks, for every course, each student independently with probability `rate`.
pub fn plan_enrollments<R: Rng>(
    rng: &mut R,
    course_ids: &[CourseId],
    student_ids: &[UserId],
    rate: f64,
) -> Vec<(CourseId, UserId)> {
    let rate = rate.clamp(0.0, 1.0);
    course_ids
        .iter()
        .flat_map(|&course_id| student_ids.iter().map(move |&student_id| (course_id, student_id)))
        .filter(|_| rng.gen_bool(rate))
        .collect()
}

pub fn generate_assignments<R: Rng>(
    rng: &mut R,
    course_ids: &[CourseId],
    per_course: usize,
) -> Vec<AssignmentSeed> {
    let now = Utc::now();
    course_ids
        .iter()
        .flat_map(|&course_id| (1..=per_course).map(move |n| (course_id, n)))
        .map(|(course_id, n)| AssignmentSeed {
            course_id,
            title: format!("Assignment {n}"),
            description: Sentence(8..16).fake(),
            due_date: now + Duration::days(rng.gen_range(1..=60)),
            max_score: DEFAULT_MAX_SCORE,
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    teacher_ids: &[UserId],
    count: usize,
) -> anyhow::Result<Vec<CourseId>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} courses...", count);

    let courses = generate_courses(teacher_ids, count);
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 1000;
    let mut ids = Vec::with_capacity(courses.len());
    for chunk in courses.chunks(BATCH_SIZE) {
        ids.extend(insert_courses_chunk(&mut tx, chunk).await?);
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );
    Ok(ids)
}

async fn insert_courses_chunk(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> anyhow::Result<Vec<CourseId>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO courses (title, description, content, teacher_id) VALUES ");
    for i in 0..courses.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for course in courses {
        q = q
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.content)
            .bind(course.teacher_id);
    }

    let ids: Vec<CourseId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

pub async fn seed_enrollments(
    db: &PgPool,
    enrollments: &[(CourseId, UserId)],
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("📝 Enrolling students ({} enrollments)...", enrollments.len());

    let mut tx = db.begin().await?;

    // 2 params per enrollment
    const BATCH_SIZE: usize = 5000;
    for chunk in enrollments.chunks(BATCH_SIZE) {
        let mut query =
            String::from("INSERT INTO course_enrollments (course_id, student_id) VALUES ");
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        }
        query.push_str(" ON CONFLICT (course_id, student_id) DO NOTHING");

        let mut q = sqlx::query(&query);
        for (course_id, student_id) in chunk {
            q = q.bind(course_id).bind(student_id);
        }
        q.execute(&mut *tx).await?;
    }

    tx.commit().await?;
    println!("   ✓ Enrolled students in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn seed_assignments(db: &PgPool, assignments: &[AssignmentSeed]) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗒️  Seeding {} assignments...", assignments.len());

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    // 5 params per assignment
    const BATCH_SIZE: usize = 1000;
    for chunk in assignments.chunks(BATCH_SIZE) {
        let mut query = String::from(
            "INSERT INTO assignments (course_id, title, description, due_date, max_score) VALUES ",
        );
        for i in 0..chunk.len() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 5;
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${})",
                p + 1,
                p + 2,
                p + 3,
                p + 4,
                p + 5
            ));
        }

        let mut q = sqlx::query(&query);
        for assignment in chunk {
            q = q
                .bind(assignment.course_id)
                .bind(&assignment.title)
                .bind(&assignment.description)
                .bind(assignment.due_date)
                .bind(assignment.max_score);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} assignments in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}
