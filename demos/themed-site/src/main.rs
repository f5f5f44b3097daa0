use std::env;

use minijinja_view::{context, Scope, View, ViewConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = ViewConfig {
        base_dir: env!("CARGO_MANIFEST_DIR").into(),
        ..Default::default()
    };
    config.update_from_env()?;

    let mut view = View::new(config)?;
    if let Some(theme) = env::args().nth(1) {
        view.set_theme(&theme)?;
    }
    let page = env::args().nth(2).unwrap_or_else(|| "index".into());

    view.set_title("Themed Site")
        .set_meta("description", "A small site rendered with themes")
        .set_meta_with("og:site_name", "Themed Site", "property")
        .set_global("year", 2024);
    view.set_context(
        context! {
            posts => vec![
                context! { title => "Hello World", slug => "hello-world" },
                context! { title => "Themes", slug => "themes" },
            ],
        },
        Scope::Local,
    )?;
    if page != "index" {
        view.prepend_title(page.as_str());
    }

    println!("{}", view.render_template(&page)?);
    Ok(())
}
