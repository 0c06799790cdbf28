use anyhow::Error;
use notewell::{
    endpoints, share_with_user_and_accept,
    tasks::{self, TaskRunner},
    ShareType, User,
};
use reqwest::Client;
use std::path::PathBuf;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::from_args();

    log::debug!("Starting application with {:#?}", args);

    match args.cmd {
        Command::Share(share) => run_share(&args.host, share).await,
        Command::Build(build) => run_build(build).await,
    }
}

async fn run_share(host: &str, args: ShareArgs) -> Result<(), Error> {
    // Remember cookies so the server can pin both sessions to the
    // same client
    let client = Client::builder()
        .user_agent(notewell::DEFAULT_USER_AGENT)
        .cookie_store(true)
        .build()?;

    let sharer = endpoints::login(
        &client,
        host,
        &args.sharer_email,
        &args.sharer_password,
    )
    .await?;
    let sharee_session = endpoints::login(
        &client,
        host,
        &args.sharee_email,
        &args.sharee_password,
    )
    .await?;
    let sharee =
        User::new(sharee_session.user_id.clone(), args.sharee_email.clone());

    let outcome = share_with_user_and_accept(
        &client,
        host,
        &sharer,
        &sharee_session,
        &sharee,
        args.share_type,
        None,
    )
    .await?;

    log::info!(
        "{} now shares {} with {} (share {}, accepted: {})",
        args.sharer_email,
        outcome.item.name,
        args.sharee_email,
        outcome.share.id,
        outcome.share_user.is_accepted,
    );

    Ok(())
}

/// The tasks the `build` aggregate runs, in the order they're listed
/// by `--list`.
const BUILD_TASKS: &[&str] = &["package-info", "plugin-assets", "styles"];

async fn run_build(args: BuildArgs) -> Result<(), Error> {
    let runner = build_runner(&args);

    if args.list {
        for name in runner.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    runner.run_parallel(BUILD_TASKS).await?;
    log::info!("Build finished");

    Ok(())
}

fn build_runner(args: &BuildArgs) -> TaskRunner {
    let mut runner = TaskRunner::new();

    let out_dir = args.out_dir.clone();
    runner.register("package-info", move || {
        let out_dir = out_dir.clone();
        async move { tasks::write_package_info(&out_dir) }
    });

    let from = args.asset_dir.clone();
    let to = args.out_dir.join("assets");
    runner.register("plugin-assets", move || {
        let (from, to) = (from.clone(), to.clone());
        async move { tasks::copy_dir_recursive(&from, &to) }
    });

    let styles = args.style_dir.clone();
    let bundle = args.out_dir.join("style.min.css");
    runner.register("styles", move || {
        let (styles, bundle) = (styles.clone(), bundle.clone());
        async move { tasks::bundle_styles(&styles, &bundle) }
    });

    runner
}

#[derive(Debug, StructOpt)]
struct Args {
    #[structopt(
        long = "host",
        default_value = "notewell.example.com",
        help = "The sync server's hostname"
    )]
    host: String,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Share an item between two accounts and accept the invitation.
    Share(ShareArgs),
    /// Run the client build pipeline.
    Build(BuildArgs),
}

#[derive(Debug, StructOpt)]
struct ShareArgs {
    #[structopt(long = "sharer-email", help = "The sharing user's email")]
    sharer_email: String,
    #[structopt(long = "sharer-password", help = "The sharing user's password")]
    sharer_password: String,
    #[structopt(long = "sharee-email", help = "The invited user's email")]
    sharee_email: String,
    #[structopt(long = "sharee-password", help = "The invited user's password")]
    sharee_password: String,
    #[structopt(
        long = "share-type",
        default_value = "app",
        help = "One of app, root-folder or link"
    )]
    share_type: ShareType,
}

#[derive(Debug, StructOpt)]
struct BuildArgs {
    #[structopt(long = "list", help = "Print the registered tasks and exit")]
    list: bool,
    #[structopt(
        long = "out-dir",
        default_value = "dist",
        parse(from_os_str),
        help = "Where build output lands"
    )]
    out_dir: PathBuf,
    #[structopt(
        long = "asset-dir",
        default_value = "assets",
        parse(from_os_str),
        help = "Plugin assets to copy into the build"
    )]
    asset_dir: PathBuf,
    #[structopt(
        long = "style-dir",
        default_value = "styles",
        parse(from_os_str),
        help = "Style sheets to bundle"
    )]
    style_dir: PathBuf,
}
