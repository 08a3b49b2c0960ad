use crate::cli::{Command, SendArgs};
use crate::config::Config;
use anyhow::Result;
use heyclaw_channel::{HeyboxBot, ReqwestTransport};
use tracing::{error, info};

/// Gateway service - wires configuration, logging and the bot together
pub struct GatewayService {
    config: Config,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one command to completion
    pub async fn run(self, command: Command) -> Result<()> {
        heyclaw_logging::init_logging(&self.config.logging.level, self.config.logging.json)?;
        info!("Starting HeyClaw Gateway");

        let transport = ReqwestTransport::new(self.config.api.timeout())?;
        let bot = HeyboxBot::new(self.config.bot.clone(), self.config.api.clone(), transport);

        match command {
            Command::Send(args) => Self::send(&bot, &args).await,
        }
    }

    async fn send(bot: &HeyboxBot<ReqwestTransport>, args: &SendArgs) -> Result<()> {
        let message = args.to_message().await?;

        match bot
            .send_to_channel(&args.room, &args.channel, message, args.reply.as_deref())
            .await
        {
            Ok(body) => {
                info!(room_id = %args.room, channel_id = %args.channel, "Message sent");
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(())
            }
            Err(e) => {
                error!(kind = ?e.kind(), "Send failed: {}", e);
                Err(e.into())
            }
        }
    }
}
