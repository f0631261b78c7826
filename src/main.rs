use serde::Serialize;
use travelx::application_impl::*;
use travelx::application_port::*;
use travelx::client::TravelClient;
use travelx::domain_model::Theme;
use travelx::logger::*;
use travelx::settings::*;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let client = TravelClient::try_new(&project_settings)?;
    let session = client.session.clone();
    session.resolve().await?;

    match cli.command {
        Command::Login(credentials) => {
            let identity = session
                .login(&credentials.username, &credentials.password)
                .await?;
            print_json(&identity)?;
        }
        Command::Register {
            credentials,
            confirm_password,
        } => {
            let identity = session
                .register(&credentials.username, &credentials.password, &confirm_password)
                .await?;
            print_json(&identity)?;
        }
        Command::Logout => {
            session.logout().await?;
            println!("signed out");
        }
        Command::Whoami => match session.identity() {
            Some(identity) => print_json(&identity)?,
            None => println!("not signed in"),
        },
        Command::Theme { theme } => {
            let identity = match theme {
                Some(theme) => {
                    let theme: Theme = theme.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                    session.update_theme(theme).await?
                }
                None => session.toggle_theme().await?,
            };
            print_json(&identity)?;
        }
        Command::Roles => print_json(&client.api().roles().await?)?,
        Command::Destinations { id, search } => match id {
            Some(id) => print_json(&client.api().get_destination(&id).await?)?,
            None => {
                let destinations = client.api().list_destinations().await?;
                let query = search.as_deref().unwrap_or_default();
                print_json(&filter_destinations(&destinations, query))?
            }
        },
        Command::Bookings { cancel } => match cancel {
            Some(id) => print_json(&client.bookings.cancel(&id).await?)?,
            None => print_json(&client.bookings.my_bookings().await?)?,
        },
        Command::Book {
            destination,
            date,
            travelers,
            pay,
            currency,
        } => {
            let draft = BookingDraft::new(destination)
                .with_travel_date(date)
                .with_travelers(travelers);
            let quote = draft.quote();
            info!(
                subtotal = quote.subtotal,
                service_fee = quote.service_fee,
                total = quote.total,
                "price estimate"
            );
            let payment = pay.map(|provider| PaymentRequest { provider, currency });
            let outcome = client.bookings.book_draft(&draft, payment).await?;
            print_json(&outcome.booking)?;
            match outcome.payment {
                PaymentOutcome::Skipped => {}
                PaymentOutcome::Paid(payment) => print_json(&payment)?,
                PaymentOutcome::Failed(e) => {
                    return Err(anyhow::anyhow!("booking created but payment failed: {}", e));
                }
            }
        }
        Command::Reviews { destination } => {
            print_json(&client.reviews.reviews(&destination).await?)?;
        }
        Command::Review {
            destination,
            rating,
            comment,
            edit,
        } => {
            if edit.is_none() && !client.reviews.eligibility(&destination).await {
                return Err(anyhow::anyhow!(ReviewError::RequiresConfirmedBooking));
            }
            let draft = ReviewDraft {
                destination_id: destination,
                rating,
                comment,
                editing: edit,
            };
            print_json(&client.reviews.submit(&draft).await?)?;
        }
        Command::Payments => print_json(&client.api().my_payments().await?)?,
    }

    Ok(())
}
