use donation_courier::core::handler::{handle_request, CourierRequest, CourierResponse};
use donation_courier::utils::{logger, validation::Validate};
use donation_courier::{BookingStore, CourierConfig, RoadieCourier};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    event: LambdaEvent<CourierRequest>,
    courier: &RoadieCourier<BookingStore>,
) -> Result<CourierResponse, Error> {
    tracing::info!("Handling courier request {}", event.context.request_id);
    Ok(handle_request(courier, event.payload).await)
}

fn build_courier() -> anyhow::Result<RoadieCourier<BookingStore>> {
    let config = CourierConfig::from_env()?;
    config.validate()?;

    let store = BookingStore::from_config(&config.persistence)?;
    Ok(RoadieCourier::new(config, store)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let courier = build_courier().map_err(|e| {
        tracing::error!("❌ Courier configuration failed: {}", e);
        Error::from(e.to_string())
    })?;
    let courier = &courier;

    run(service_fn(move |event: LambdaEvent<CourierRequest>| async move {
        function_handler(event, courier).await
    }))
    .await
}
