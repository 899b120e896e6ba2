use std::{fs, io::Write, path::PathBuf, time::Duration};

use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use rand::{SeedableRng, rngs::StdRng};
use tracing::warn;
use vitrine::{checkout::CheckoutForm, receipt};
use vitrine_app::{
    address::ViaCepClient,
    checkout::{CheckoutService, Submission},
    config::StoreConfig,
};

use super::{open_storefront, save_storefront, stdout};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// YAML file with the checkout form fields
    #[arg(long)]
    form: PathBuf,

    /// Accept the terms and conditions
    #[arg(long)]
    accept_terms: bool,

    /// Skip filling the address from the CEP
    #[arg(long)]
    no_autofill: bool,

    /// Seed for the order code generator
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) async fn run(config: &StoreConfig, args: CheckoutArgs) -> Result<(), String> {
    let contents = fs::read_to_string(&args.form)
        .map_err(|error| format!("failed to read {}: {error}", args.form.display()))?;
    let mut form: CheckoutForm = serde_norway::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.form.display()))?;

    let mut storefront = open_storefront(config)?;
    let service = CheckoutService::new(
        ViaCepClient::new(config.cep_base_url.clone()),
        config.checkout_settings(),
    );

    if !args.no_autofill {
        service.autofill_address(&mut form).await;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = stdout();

    writeln!(out, "Processando pagamento...").map_err(|error| error.to_string())?;

    let submission = service
        .submit(&mut storefront, &form, args.accept_terms, &mut rng)
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    let id = match submission {
        Submission::Confirmed(id) => id,
        Submission::PixPending(pix) => {
            let payment = pix.payment();

            writeln!(
                out,
                "Pague com PIX\n\n{}\n\nPIX copia e cola:\n{}\n",
                payment.qr().render(),
                payment.code
            )
            .map_err(|error| error.to_string())?;

            service
                .confirm_pix(&mut storefront, pix, |remaining: Duration| {
                    print_countdown(&mut out, remaining);
                })
                .await
                .map_err(|error| format!("checkout failed: {error}"))?
        }
    };

    save_storefront(&mut storefront)?;

    let order = storefront.order(&id).map_err(|error| error.to_string())?;

    writeln!(out, "Pedido confirmado!").map_err(|error| error.to_string())?;

    receipt::write_order(&mut out, order).map_err(|error| error.to_string())
}

fn print_countdown(out: &mut impl Write, remaining: Duration) {
    if let Err(error) = writeln!(
        out,
        "Aguardando pagamento... {}",
        remaining.human(Truncate::Second)
    ) {
        warn!(%error, "failed to print pix countdown");
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn countdown_prints_remaining_time() {
        let mut out = Vec::new();

        print_countdown(&mut out, Duration::from_secs(7));

        let text = String::from_utf8_lossy(&out);

        assert!(text.starts_with("Aguardando pagamento... "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn countdown_survives_a_closed_stdout() {
        print_countdown(&mut Closed, Duration::from_secs(3));
    }
}
