use anyhow::Error;
use notewell::{
    e2ee::{decrypted_stat_text, EncryptedItemsStats, EncryptionService},
    endpoints, share_with_user_and_accept, ShareType, User,
};
use reqwest::Client;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::from_args();

    log::debug!("Starting the demo with {:#?}", args);

    // Create a HTTP client, remembering cookies so the server can pin
    // both sessions to the same client
    let client = Client::builder()
        .user_agent(notewell::DEFAULT_USER_AGENT)
        .cookie_store(true)
        .build()?;

    // both participants need a session of their own
    let sharer = endpoints::login(
        &client,
        &args.host,
        &args.sharer_email,
        &args.sharer_password,
    )
    .await?;
    let sharee_session = endpoints::login(
        &client,
        &args.host,
        &args.sharee_email,
        &args.sharee_password,
    )
    .await?;

    let sharee =
        User::new(sharee_session.user_id.clone(), args.sharee_email.clone());

    // The whole handshake in one call: upload an item, share it,
    // invite the second user, accept on their behalf.
    let outcome = share_with_user_and_accept(
        &client,
        &args.host,
        &sharer,
        &sharee_session,
        &sharee,
        ShareType::App,
        None,
    )
    .await?;

    log::info!(
        "Share {} of {} accepted by {} (is_accepted = {})",
        outcome.share.id,
        outcome.item.name,
        sharee.email,
        outcome.share_user.is_accepted
    );

    // the share is also visible through the plain GET endpoint
    let share =
        endpoints::get_share(&client, &args.host, &sharer, &outcome.share.id)
            .await?;
    log::info!("{:#?}", share);

    // The encryption side needs no server at all: generate a master
    // key, prove the password checks out, and render the stats line
    // the config screen would show.
    let service = EncryptionService::new();
    let master_key = service.generate_master_key(&args.sharer_password)?;
    log::info!(
        "Generated master key {} (password valid: {})",
        master_key.id,
        service.check_master_key_password(&master_key, &args.sharer_password)
    );

    let stats = EncryptedItemsStats {
        encrypted: Some(2),
        total: Some(5),
    };
    log::info!("{}", decrypted_stat_text(&stats));

    Ok(())
}

#[derive(Debug, StructOpt)]
struct Args {
    #[structopt(
        long = "host",
        default_value = "notewell.example.com",
        help = "The sync server's hostname"
    )]
    host: String,
    #[structopt(long = "sharer-email", help = "The sharing user's email")]
    sharer_email: String,
    #[structopt(long = "sharer-password", help = "The sharing user's password")]
    sharer_password: String,
    #[structopt(long = "sharee-email", help = "The invited user's email")]
    sharee_email: String,
    #[structopt(long = "sharee-password", help = "The invited user's password")]
    sharee_password: String,
}
