use chime::infra::MainProgram;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut program = MainProgram::new();
    program.run().await
}
