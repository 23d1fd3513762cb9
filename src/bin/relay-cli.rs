use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send prompts to a running Damian.AI relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay a prompt and print the generated text
    Ask {
        /// Prompt text; the relay's placeholder is used when omitted
        prompt: Option<String>,

        /// Persona language (es, de, en)
        #[arg(short, long)]
        lang: Option<String>,

        /// Profile as a JSON object
        #[arg(short, long)]
        profile: Option<String>,

        /// Short biography appended to the persona
        #[arg(short, long)]
        mini_bio: Option<String>,
    },
    /// Check that the relay answers
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ask {
            prompt,
            lang,
            profile,
            mini_bio,
        } => {
            let mut body = json!({});
            if let Some(prompt) = prompt {
                body["prompt"] = Value::String(prompt);
            }
            if let Some(lang) = lang {
                body["lang"] = Value::String(lang);
            }
            if let Some(profile) = profile {
                body["profile"] = serde_json::from_str(&profile)?;
            }
            if let Some(mini_bio) = mini_bio {
                body["miniBio"] = Value::String(mini_bio);
            }

            let res = client
                .post(format!("{}/api/damianai", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    println!("{}", text);
    Ok(())
}
