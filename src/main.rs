use clap::{arg, crate_version, Command};
use lzhuf_yapp::{codec, yapp};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Compress:      `lzhuf-yapp compress -i my_expanded -o my_compressed`
Expand:        `lzhuf-yapp expand -i my_compressed -o my_expanded`
Compress for B2F transport (CRC-16/XMODEM prefix):
               `lzhuf-yapp compress -i my_expanded -o my_compressed --b2f`
Exercise the YAPP frame engine over an in-memory loopback channel:
               `lzhuf-yapp session-demo -i my_expanded -s \"test subject\"`";

    let mut main_cmd = Command::new("lzhuf-yapp")
        .about("Compress and expand LZHUF streams used by YAPP/B2F mail forwarding")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .arg(arg!(--b2f "prefix a CRC-16/XMODEM over the compressed body").required(false))
            .about("compress a file to an LZHUF stream"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("expand")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .arg(arg!(--b2f "the input carries a CRC-16/XMODEM prefix").required(false))
            .about("expand an LZHUF stream to a file"),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("session-demo")
            .arg(arg!(-i --input <PATH> "message body path").required(true))
            .arg(arg!(-s --subject <SUBJECT> "message subject").required(true))
            .about("send then receive a message over an in-memory YAPP loopback channel"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let b2f = cmd.get_flag("b2f");
        let dat = std::fs::read(path_in)?;
        let mut out_file = tempfile::tempfile()?;
        codec::encode(&dat, &mut out_file, b2f)?;
        std::io::Seek::seek(&mut out_file, std::io::SeekFrom::Start(0))?;
        let mut compressed = Vec::new();
        std::io::Read::read_to_end(&mut out_file, &mut compressed)?;
        std::fs::write(path_out, compressed)?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let b2f = cmd.get_flag("b2f");
        let dat = std::fs::read(path_in)?;
        let expanded = codec::decode_slice(&dat, b2f)?;
        std::fs::write(path_out, expanded)?;
    }

    if let Some(cmd) = matches.subcommand_matches("session-demo") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let subject = cmd.get_one::<String>("subject").expect(RCH);
        let body = std::fs::read(path_in)?;

        let mut sender = yapp::loopback::LoopbackChannel::from_bytes(&[]);
        yapp::session::send_yapp(&mut sender, &body, subject, yapp::session::STD_OPTIONS)?;
        let wire_bytes = sender.written().to_vec();
        println!("sent {} bytes over {} frame bytes", body.len(), wire_bytes.len());

        let mut receiver = yapp::loopback::LoopbackChannel::from_bytes(&wire_bytes);
        let (received_subject, received_body) =
            yapp::session::recv_yapp(&mut receiver, yapp::session::STD_OPTIONS)?;
        println!("received subject: {received_subject}");
        println!("received {} bytes, matches input: {}", received_body.len(), received_body == body);
    }

    Ok(())
}
