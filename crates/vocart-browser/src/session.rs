//! Live Chrome session driven over the DevTools protocol

use crate::login::{FORM_TIMEOUT, LoginOutcome, fill_sign_in};
use crate::profile::{ProfileChoice, ProfileManager};
use crate::storefront::{Storefront, TabSwitch};
use crate::{CdpPage, ChromeFinder, ChromeLauncher, Error, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;
use tokio::task::JoinHandle;
use vocart_core::{Credentials, Marketplace};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);
/// Time for a product link opened from search results to spawn its tab
const NEW_TAB_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub chrome_path: Option<PathBuf>,
    pub profile: ProfileChoice,
    pub port: u16,
}

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    chrome: Child,
    // Held so a temporary profile outlives Chrome
    _profile: ProfileManager,
    main: CdpPage,
    current: CdpPage,
    on_product_tab: bool,
    marketplace: Marketplace,
}

impl BrowserSession {
    /// Start Chrome, attach to it and open the marketplace home page
    pub async fn launch(config: &BrowserConfig, marketplace: Marketplace) -> Result<Self> {
        let chrome_path = ChromeFinder::new(config.chrome_path.clone()).find()?;
        let profile = ProfileManager::open(&config.profile)?;
        tracing::info!("Using profile: {}", profile.path().display());

        let mut chrome =
            ChromeLauncher::new(chrome_path, profile.path().to_path_buf(), config.port).launch()?;

        let (browser, handler) = match connect(config.port).await {
            Ok(connected) => connected,
            Err(e) => {
                let _ = chrome.kill();
                return Err(e);
            }
        };

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => page,
            None => browser.new_page("about:blank").await?,
        };
        let main = CdpPage::new(page);
        main.goto(marketplace.home_url()).await?;

        Ok(Self {
            browser,
            handler,
            chrome,
            _profile: profile,
            current: main.clone(),
            main,
            on_product_tab: false,
            marketplace,
        })
    }

    /// Close the DevTools connection and stop Chrome
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        self.handler.abort();
        if let Err(e) = self.chrome.kill() {
            tracing::debug!("Chrome already exited: {}", e);
        }
        let _ = self.chrome.wait();
        tracing::info!("Browser closed");
    }
}

async fn connect(port: u16) -> Result<(Browser, JoinHandle<()>)> {
    let url = format!("http://localhost:{}", port);
    let mut attempt = 1;

    let (browser, mut handler) = loop {
        tracing::debug!("Attempting CDP connection to {}...", url);
        match Browser::connect(&url).await {
            Ok(connected) => break connected,
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                tracing::debug!("CDP connection attempt {} failed: {}", attempt, e);
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(e) => {
                return Err(Error::Cdp(format!(
                    "Failed to connect to Chrome after {} attempts: {}",
                    CONNECT_ATTEMPTS, e
                )));
            }
        }
    };
    tracing::info!("CDP connection established");

    // Commands only complete while the handler is polled
    let task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!("CDP handler event error: {}", e);
            }
        }
    });

    Ok((browser, task))
}

#[async_trait(?Send)]
impl Storefront for BrowserSession {
    type Page = CdpPage;

    fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }

    fn page(&self) -> &CdpPage {
        &self.current
    }

    async fn sign_in(&mut self, credentials: &Credentials) -> LoginOutcome {
        let attempt = async {
            let url = self.marketplace.sign_in_url()?;
            self.main.goto(url.as_str()).await?;
            fill_sign_in(&self.main, credentials, FORM_TIMEOUT).await?;
            Ok::<_, Error>(())
        };

        match attempt.await {
            Ok(()) => LoginOutcome::Submitted,
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                LoginOutcome::Failed(e.to_string())
            }
        }
    }

    async fn search(&mut self, term: &str) -> Result<()> {
        let url = self.marketplace.search_url(term);
        self.main.goto(&url).await
    }

    async fn switch_to_product(&mut self) -> Result<TabSwitch> {
        tokio::time::sleep(NEW_TAB_DELAY).await;

        let main_target = self.main.inner().target_id().clone();
        let product = self
            .browser
            .pages()
            .await?
            .into_iter()
            .find(|page| *page.target_id() != main_target);

        match product {
            Some(page) => {
                let page = CdpPage::new(page);
                page.bring_to_front().await?;
                self.current = page;
                self.on_product_tab = true;
                tracing::info!("Switched to product tab");
                Ok(TabSwitch::NewTab)
            }
            None => {
                self.current = self.main.clone();
                self.on_product_tab = false;
                tracing::info!("No new tab opened, staying on current page");
                Ok(TabSwitch::SameTab)
            }
        }
    }

    async fn finish_product(&mut self) -> Result<()> {
        if self.on_product_tab {
            let product = std::mem::replace(&mut self.current, self.main.clone());
            self.on_product_tab = false;
            if let Err(e) = product.into_inner().close().await {
                tracing::warn!("Could not close product tab: {}", e);
            }
            self.main.bring_to_front().await?;
        }
        self.main.goto(self.marketplace.home_url()).await
    }
}
