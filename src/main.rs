#[actix_web::main]
async fn main() -> std::io::Result<()> {
    paystub_dispatch_lib::run().await
}
