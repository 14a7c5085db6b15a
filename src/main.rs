fn main() -> anyhow::Result<()> {
    let command_line_interface = yang_tosca::cli::CommandLineInterface::load();
    command_line_interface.run()
}
