use anyhow::{Context, bail};
use linepay_rs::ports::{PaymentDetailsParams, RefundPaymentRequest};
use linepay_rs::{LinePayClient, LinePayPort};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  linepay status  <transactionId>
  linepay details [--transaction-id ID[,ID..]] [--order-id ID[,ID..]] [--fields FIELDS]
  linepay void    <transactionId>
  linepay refund  <transactionId> [amount]";

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn split_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

fn parse_details_args(args: &[String]) -> anyhow::Result<PaymentDetailsParams> {
    let mut params = PaymentDetailsParams::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .with_context(|| format!("missing value for {}", flag))?;
        match flag.as_str() {
            "--transaction-id" => params.transaction_id = Some(split_ids(value)),
            "--order-id" => params.order_id = Some(split_ids(value)),
            "--fields" => params.fields = Some(value.clone()),
            other => bail!("unknown option {}\n{}", other, USAGE),
        }
    }

    Ok(params)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{}", USAGE);
    };

    let client = LinePayClient::from_env().context("failed to load LINE Pay configuration")?;
    info!("Using LINE Pay endpoint {}", client.base_url());

    match (command.as_str(), rest) {
        ("status", [transaction_id]) => print_json(&client.check_status(transaction_id).await?),
        ("details", flags) => {
            let params = parse_details_args(flags)?;
            print_json(&client.get_details(&params).await?)
        }
        ("void", [transaction_id]) => print_json(&client.void(transaction_id).await?),
        ("refund", [transaction_id, amount @ ..]) if amount.len() <= 1 => {
            let refund_amount = amount
                .first()
                .map(|a| a.parse::<f64>())
                .transpose()
                .context("refund amount must be a number")?;
            let body = RefundPaymentRequest { refund_amount };
            print_json(&client.refund(transaction_id, &body).await?)
        }
        _ => bail!("{}", USAGE),
    }
}
