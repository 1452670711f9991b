//! Generate a course outline and one expanded lesson.
//!
//! ```bash
//! COURSEGEN_API_KEY=sk-... cargo run -p coursegen --example generate_outline -- "Knot tying"
//! ```

use std::time::Duration;

use coursegen::prelude::*;
use coursegen::USER_FAILURE_MESSAGE;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coursegen::telemetry::init_tracing();

    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Knot tying".to_string());
    let generator = Generator::from_env()?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let options = GenerationOptions::new()
        .max_retries(3)
        .base_delay(Duration::from_millis(500))
        .cancellation(cancel.clone());

    let input = OutlineInput::new(&topic, "curious beginners", 3)
        .description("A short practical course");
    let outline = match generator.generate_outline(&input, options.clone()).await {
        Ok(outline) => outline,
        Err(err) if err.is_cancelled() => return Ok(()),
        Err(err) => {
            eprintln!("{}", err.user_message().unwrap_or(USER_FAILURE_MESSAGE));
            eprintln!("  {}", err.diagnostic());
            return Err(err.into());
        }
    };

    println!("{}", outline.title);
    for module in &outline.modules {
        println!("  {}", module.title);
        for lesson in &module.lessons {
            println!("    - {}", lesson.title);
        }
    }

    let Some((module, first)) = outline
        .modules
        .iter()
        .find_map(|m| m.lessons.first().map(|l| (m, l)))
    else {
        return Ok(());
    };

    let lesson = generator
        .expand_lesson(
            &LessonInput {
                course_title: outline.title.clone(),
                module_title: module.title.clone(),
                lesson_title: first.title.clone(),
                lesson_summary: first.summary.clone(),
                audience: "curious beginners".into(),
            },
            options,
        )
        .await?;

    match lesson.estimated_minutes {
        Some(minutes) => println!("\n{} (~{minutes} min)", lesson.title),
        None => println!("\n{}", lesson.title),
    }
    println!("\n{}", lesson.content);
    Ok(())
}
