//! Bundled project snapshot shown when the backend cannot be reached

use super::Project;

/// Local copy of the portfolio's project list
pub fn fallback_projects() -> Vec<Project> {
    vec![
        Project::new("Portfolio Website")
            .with_id(1)
            .with_description(
                "Single-page portfolio with hero, about, experience, projects and contact sections.",
            )
            .with_image_src("projects/portfolio.png")
            .with_repo_url("https://github.com/folio-admin/portfolio"),
        Project::new("Weather Dashboard")
            .with_id(2)
            .with_description("Five-day forecast viewer backed by a public weather API.")
            .with_image_src("projects/weather.png"),
        Project::new("Task Tracker")
            .with_id(3)
            .with_description("Kanban-style task board with drag-and-drop columns.")
            .with_image_src("projects/tasks.png"),
    ]
}
