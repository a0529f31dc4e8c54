mod args;

use course_core::model::CourseId;
use course_core::navigation::NextTarget;
use services::{ApiConfig, AppServices, Clock, CourseSession};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::args::{Args, ArgsError, Command};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  knowledgeflow [--db <sqlite_url>] [--api <url>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login <username>                    remember the signed-in learner");
    eprintln!("  logout");
    eprintln!("  whoami");
    eprintln!("  courses [--category <c>] [--search <text>]");
    eprintln!("  enroll <course>");
    eprintln!("  enrolled");
    eprintln!("  show <course>                       progress, active lesson and next step");
    eprintln!("  lesson <course> <lesson>            mark a lesson complete");
    eprintln!("  lessons-done <course>               mark every lesson complete");
    eprintln!("  answer <course> <quiz> <option>     select an answer (zero-based)");
    eprintln!("  submit <course> <quiz>");
    eprintln!("  submit-all <course>                 submit every answered quiz");
    eprintln!("  complete <course>                   force-complete and unlock the certificate");
    eprintln!("  next <course> [--from <lesson>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db  {}", args::DEFAULT_DB_URL);
    eprintln!("  --api {}", services::config::DEFAULT_API_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  KNOWLEDGEFLOW_DB_URL, KNOWLEDGEFLOW_API_URL, KNOWLEDGEFLOW_API_TIMEOUT_SECS, RUST_LOG");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    prepare_sqlite_dir(&args.db_url)?;
    let mut api = ApiConfig::from_env();
    if let Some(url) = args.api_url {
        api.base_url = url;
    }
    let services = AppServices::new_sqlite(&args.db_url, api, Clock::default()).await?;

    match args.command {
        Command::Help => {}
        Command::Login(learner) => {
            let session = services.sign_in(learner).await?;
            println!("signed in as {}", session.learner());
        }
        Command::Logout => {
            services.sign_out().await?;
            println!("signed out");
        }
        Command::Whoami => match services.current_session().await? {
            Some(session) => println!("{}", session.learner()),
            None => println!("not signed in"),
        },
        Command::Courses { category, search } => {
            let courses = services
                .list_courses(category.as_deref(), search.as_deref())
                .await?;
            for course in courses {
                println!(
                    "{:<24} {:<16} {}",
                    course.id,
                    course.category.as_deref().unwrap_or("-"),
                    course.title.as_deref().unwrap_or("")
                );
            }
        }
        Command::Enroll(course) => {
            let enrollment = services.enroll(&course).await?;
            println!("{}", enrollment.message);
        }
        Command::Enrolled => {
            for course in services.enrolled_courses().await? {
                println!(
                    "{:<24} {:>3}%  {}",
                    course.id,
                    course.progress,
                    course.title.as_deref().unwrap_or("")
                );
            }
        }
        Command::Show(course) => {
            let session = open(&services, &course).await?;
            print_active_lesson(&session);
            print_summary(&session);
        }
        Command::Lesson { course, lesson } => {
            let mut session = open(&services, &course).await?;
            let changed = session.mark_lesson_complete(&lesson).await;
            report(changed, "lesson completed", "lesson already completed or not in course");
            finish(session).await;
        }
        Command::LessonsDone(course) => {
            let mut session = open(&services, &course).await?;
            let changed = session.mark_all_lessons_complete().await;
            report(changed, "all lessons completed", "nothing to complete");
            finish(session).await;
        }
        Command::Answer {
            course,
            quiz,
            option,
        } => {
            let mut session = open(&services, &course).await?;
            let changed = session.select_answer(&quiz, option).await;
            report(changed, "answer selected", "answer unchanged or quiz already submitted");
            finish(session).await;
        }
        Command::Submit { course, quiz } => {
            let mut session = open(&services, &course).await?;
            let changed = session.submit_quiz(&quiz).await;
            report(changed, "quiz submitted", "quiz has no answer or was already submitted");
            finish(session).await;
        }
        Command::SubmitAll(course) => {
            let mut session = open(&services, &course).await?;
            let submitted = session.submit_all_answered().await;
            println!("submitted {submitted} quiz(zes)");
            finish(session).await;
        }
        Command::Complete(course) => {
            let mut session = open(&services, &course).await?;
            let changed = session.complete_course().await;
            report(changed, "course completed", "course was already complete");
            finish(session).await;
        }
        Command::Next { course, from } => {
            let mut session = open(&services, &course).await?;
            if let Some(lesson) = from {
                if !session.select_lesson(&lesson) {
                    return Err(format!("lesson {lesson} is not part of course {course}").into());
                }
            }
            match session.go_next() {
                Some(NextTarget::Lesson(_)) => print_active_lesson(&session),
                Some(NextTarget::Quiz(quiz)) => println!("next: quiz {quiz}"),
                Some(NextTarget::Certificate) => match session.certificate_link() {
                    Some(link) => println!("next: certificate {link}"),
                    None => println!("next: certificate"),
                },
                None => println!("nothing left to do yet"),
            }
        }
    }

    Ok(())
}

async fn open(services: &AppServices, course: &CourseId) -> Result<CourseSession, Box<dyn std::error::Error>> {
    Ok(services.open_course(course).await?)
}

async fn finish(mut session: CourseSession) {
    session.flush().await;
    print_summary(&session);
}

fn report(changed: bool, done: &str, unchanged: &str) {
    if changed {
        println!("{done}");
    } else {
        println!("{unchanged}");
    }
}

fn print_active_lesson(session: &CourseSession) {
    let course = session.tracker().course();
    let Some(lesson) = session.active_lesson().and_then(|id| course.lesson(id)) else {
        println!("no lessons in this course");
        return;
    };
    println!("lesson {}: {}", lesson.id, lesson.title);
    if let Some(url) = session.active_video_url().filter(|url| !url.is_empty()) {
        println!("  video {url}");
    }
}

fn print_summary(session: &CourseSession) {
    let course = session.tracker().course();
    let summary = session.summary();
    println!("{} ({})", course.title, course.id);
    println!(
        "  lessons   {}/{}",
        summary.completed_lessons, summary.total_lessons
    );
    println!(
        "  quizzes   {}/{} submitted, {} correct",
        summary.submitted_quizzes, summary.total_quizzes, summary.correct_answers
    );
    println!("  progress  {}%", summary.percent);
    match session.certificate_link() {
        Some(link) => println!("  certificate unlocked: {link}"),
        None if summary.certificate_unlocked => println!("  certificate unlocked"),
        None => println!("  certificate locked"),
    }
    let next = match session.next_target() {
        Some(NextTarget::Lesson(id)) => format!("lesson {id}"),
        Some(NextTarget::Quiz(id)) => format!("quiz {id}"),
        Some(NextTarget::Certificate) => "certificate".to_owned(),
        None => "-".to_owned(),
    };
    println!("  next      {next}");
}

fn prepare_sqlite_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
