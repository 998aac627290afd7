fn main() -> release_tools::SnafuReport<release_tools::Error> {
    release_tools::release_tools_main()
}
