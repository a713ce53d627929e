use super::*;

fn specific(identifier: &'static str, version: &[u32], profile: Option<&str>) -> TargetFramework {
    TargetFramework::Specific {
        identifier,
        version: FrameworkVersion(version.to_vec()),
        profile: profile.map(Into::into),
    }
}

#[test]
fn short_names() -> Result<(), Error> {
    assert_eq!("net45".parse::<TargetFramework>()?, specific(".NETFramework", &[4, 5], None));
    assert_eq!(
        "net451".parse::<TargetFramework>()?,
        specific(".NETFramework", &[4, 5, 1], None)
    );
    assert_eq!(
        "net40-client".parse::<TargetFramework>()?,
        specific(".NETFramework", &[4, 0], Some("client"))
    );
    assert_eq!(
        "netstandard2.0".parse::<TargetFramework>()?,
        specific(".NETStandard", &[2, 0], None)
    );
    assert_eq!(
        "NetCoreApp3.1".parse::<TargetFramework>()?,
        specific(".NETCoreApp", &[3, 1], None)
    );
    assert_eq!(
        "xamarin.ios10".parse::<TargetFramework>()?,
        specific("Xamarin.iOS", &[1, 0], None)
    );
    assert_eq!("native".parse::<TargetFramework>()?, specific("native", &[], None));
    assert_eq!("sl".parse::<TargetFramework>()?, specific("Silverlight", &[0], None));
    Ok(())
}

#[test]
fn modern_net_is_core() -> Result<(), Error> {
    assert_eq!(
        "net6.0-windows10.0.19041".parse::<TargetFramework>()?,
        specific(".NETCoreApp", &[6, 0], Some("windows10.0.19041"))
    );
    Ok(())
}

#[test]
fn long_names() -> Result<(), Error> {
    assert_eq!(
        ".NETFramework,Version=v4.5".parse::<TargetFramework>()?,
        specific(".NETFramework", &[4, 5], None)
    );
    assert_eq!(
        ".NETFramework, Version=4.0, Profile=Client".parse::<TargetFramework>()?,
        specific(".NETFramework", &[4, 0], Some("Client"))
    );
    assert_eq!(
        "silverlight,Version=v5.0".parse::<TargetFramework>()?,
        specific("Silverlight", &[5, 0], None)
    );
    Ok(())
}

#[test]
fn portable() -> Result<(), Error> {
    let fx: TargetFramework = "portable-net45+win8+wpa81".parse()?;
    assert_eq!(
        fx,
        TargetFramework::Portable(vec![
            specific(".NETFramework", &[4, 5], None),
            specific("Windows", &[8], None),
            specific("WindowsPhoneApp", &[8, 1], None),
        ])
    );
    assert_eq!(
        fx.to_string(),
        ".NETPortable,Version=v0.0,Profile=net45+win8+wpa81"
    );
    Ok(())
}

#[test]
fn display() -> Result<(), Error> {
    let fx: TargetFramework = "net40-client".parse()?;
    assert_eq!(fx.to_string(), ".NETFramework,Version=v4.0,Profile=client");

    let fx: TargetFramework = "win8".parse()?;
    assert_eq!(fx.to_string(), "Windows,Version=v8.0");
    Ok(())
}

#[test]
fn rejects() {
    assert_eq!("".parse::<TargetFramework>(), Err(Error::Empty));
    assert_eq!(
        "bogus45".parse::<TargetFramework>(),
        Err(Error::UnknownIdentifier("bogus".into()))
    );
    assert_eq!(
        "net45678".parse::<TargetFramework>(),
        Err(Error::InvalidVersion("45678".into()))
    );
    assert_eq!(
        "net4.".parse::<TargetFramework>(),
        Err(Error::InvalidVersion("4.".into()))
    );
    assert_eq!(
        "net 45".parse::<TargetFramework>(),
        Err(Error::Malformed("net 45".into()))
    );
    assert_eq!(
        ".NETFramework,Flavor=v4.5".parse::<TargetFramework>(),
        Err(Error::Malformed(".NETFramework,Flavor=v4.5".into()))
    );
    assert_eq!(
        ".NETFramework,Profile=Client".parse::<TargetFramework>(),
        Err(Error::Malformed(".NETFramework,Profile=Client".into()))
    );
    assert_eq!("portable-".parse::<TargetFramework>(), Err(Error::EmptyPortable));
    assert_eq!(
        "portable-net45+bogus".parse::<TargetFramework>(),
        Err(Error::UnknownIdentifier("bogus".into()))
    );
}
