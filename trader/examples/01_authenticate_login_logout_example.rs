use ctp_mini_core::unittest::setup::{model::*, transport::LoopbackTransport, wait::*};
use ctp_mini_trader::prelude::*;
use log::info;

fn main() -> Result<(), std::io::Error> {
    env_logger::builder().filter_level(log::LevelFilter::Info).try_init().unwrap();

    let config = TraderConfig::new(FRONT_ADDRESS, APP_ID, AUTH_CODE, BROKER_ID).with_name("example-trader");
    let counter = CounterSpi::new_ref();
    let spi = ChainSpi::new_ref(vec![LoggerSpi::new_ref(), counter.clone()]);

    let mut client = TraderClient::new(config, LoopbackTransport::new(), spi)?;
    assert!(client.is_connected_busywait_timeout(default_connect_timeout()));
    info!("client: {}", client);

    let auth = client.req_authenticate(USER_ID)?.wait_last_timeout(default_reply_timeout())?;
    info!("authenticated: {}", auth);

    let login = client.req_user_login(PASSWORD)?.wait_last_timeout(default_reply_timeout())?;
    info!("logged in: {}, trading day: {:?}", login, client.trading_day_date()?);

    let logout = client.req_user_logout()?.wait_last_timeout(default_reply_timeout())?;
    info!("logged out: {}", logout);

    client.release();
    info!("client: {}, counter: {}", client, counter);
    Ok(())
}
