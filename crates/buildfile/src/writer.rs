//! Buildfile Writer
//!
//! Serializes a [`Descriptor`] into an Ant buildfile driving the JavaFX Ant tasks.

use std::io::Cursor;
use std::path::Path;
use quick_xml::{Writer, events::{Event, BytesStart, BytesEnd, BytesDecl}};
use tracing::info;

use crate::descriptor::{
    ApplicationInstruction, DeployInstruction, Descriptor, FileSet, Instruction, JarInstruction,
    ResourcesInstruction, SignInstruction, SignTarget,
};

/// Namespace URI of the JavaFX Ant tasks
pub const JAVAFX_ANT_URI: &str = "javafx:com.sun.javafx.tools.ant";

/// Resource inside `ant-javafx.jar` declaring the tasks
pub const JAVAFX_ANTLIB: &str = "com/sun/javafx/tools/ant/antlib.xml";

/// Writer errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("XML write error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Descriptor references unknown resources `{0}`")]
    UnknownResources(String),
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Buildfile writer
pub struct BuildfileWriter {
    indent: usize,
}

impl BuildfileWriter {
    /// Create a new writer with default settings
    pub fn new() -> Self {
        Self { indent: 4 }
    }

    /// Write the buildfile to a string
    pub fn write_to_string(&self, descriptor: &Descriptor) -> Result<String, WriteError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut project = BytesStart::new("project");
        project.push_attribute(("name", descriptor.name.as_str()));
        project.push_attribute(("default", "default"));
        project.push_attribute(("basedir", "."));
        project.push_attribute(("xmlns:fx", JAVAFX_ANT_URI));
        writer.write_event(Event::Start(project))?;

        let mut target = BytesStart::new("target");
        target.push_attribute(("name", "default"));
        writer.write_event(Event::Start(target))?;

        let mut taskdef = BytesStart::new("taskdef");
        taskdef.push_attribute(("resource", JAVAFX_ANTLIB));
        taskdef.push_attribute(("uri", JAVAFX_ANT_URI));
        taskdef.push_attribute(("classpath", path_str(&descriptor.ant_lib).as_str()));
        writer.write_event(Event::Empty(taskdef))?;

        let application = descriptor.instructions.iter().find_map(|i| match i {
            Instruction::Application(app) => Some(app),
            _ => None,
        });

        for instruction in &descriptor.instructions {
            match instruction {
                Instruction::Application(app) => self.write_application(&mut writer, app)?,
                Instruction::Resources(res) => self.write_resources(&mut writer, res)?,
                Instruction::Jar(jar) => {
                    let resources = descriptor
                        .resources(&jar.resources_ref)
                        .ok_or_else(|| WriteError::UnknownResources(jar.resources_ref.clone()))?;
                    self.write_jar(&mut writer, jar, resources, application)?
                }
                Instruction::Sign(sign) => self.write_sign(&mut writer, sign)?,
                Instruction::Deploy(deploy) => self.write_deploy(&mut writer, deploy, application)?,
            }
        }

        writer.write_event(Event::End(BytesEnd::new("target")))?;
        writer.write_event(Event::End(BytesEnd::new("project")))?;

        let mut result = writer.into_inner().into_inner();
        result.push(b'\n');
        Ok(String::from_utf8(result)?)
    }

    /// Write the buildfile to its location in the output layout
    pub async fn write_to_file(&self, descriptor: &Descriptor, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let content = self.write_to_string(descriptor)?;
        if let Some(parent) = path.as_ref().parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path.as_ref(), content).await?;
        info!("Wrote buildfile to {:?}", path.as_ref());
        Ok(())
    }

    fn write_application<W: std::io::Write>(&self, writer: &mut Writer<W>, app: &ApplicationInstruction) -> Result<(), WriteError> {
        let mut elem = BytesStart::new("fx:application");
        elem.push_attribute(("id", app.id.as_str()));
        elem.push_attribute(("name", app.name.as_str()));
        elem.push_attribute(("mainClass", app.main_class.as_str()));
        if let Some(ref version) = app.version {
            elem.push_attribute(("version", version.as_str()));
        }
        writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn write_application_ref<W: std::io::Write>(&self, writer: &mut Writer<W>, refid: &str) -> Result<(), WriteError> {
        let mut elem = BytesStart::new("fx:application");
        elem.push_attribute(("refid", refid));
        writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn write_platform<W: std::io::Write>(&self, writer: &mut Writer<W>, app: Option<&ApplicationInstruction>) -> Result<(), WriteError> {
        let app = match app {
            Some(app) if app.has_platform_settings() => app,
            _ => return Ok(()),
        };

        writer.write_event(Event::Start(BytesStart::new("fx:platform")))?;
        for option in &app.jvm_options {
            let mut elem = BytesStart::new("fx:jvmarg");
            elem.push_attribute(("value", option.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        for (name, value) in &app.jvm_properties {
            let mut elem = BytesStart::new("fx:property");
            elem.push_attribute(("name", name.as_str()));
            elem.push_attribute(("value", value.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        writer.write_event(Event::End(BytesEnd::new("fx:platform")))?;
        Ok(())
    }

    fn write_fileset<W: std::io::Write>(&self, writer: &mut Writer<W>, tag: &str, set: &FileSet) -> Result<(), WriteError> {
        let mut elem = BytesStart::new(tag);
        elem.push_attribute(("dir", path_str(&set.dir).as_str()));
        elem.push_attribute(("includes", set.includes.as_str()));
        writer.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn write_resources<W: std::io::Write>(&self, writer: &mut Writer<W>, res: &ResourcesInstruction) -> Result<(), WriteError> {
        let mut elem = BytesStart::new("fx:resources");
        elem.push_attribute(("id", res.id.as_str()));

        if res.libraries.is_empty() {
            writer.write_event(Event::Empty(elem))?;
            return Ok(());
        }

        writer.write_event(Event::Start(elem))?;
        for set in &res.libraries {
            self.write_fileset(writer, "fx:fileset", set)?;
        }
        writer.write_event(Event::End(BytesEnd::new("fx:resources")))?;
        Ok(())
    }

    fn write_jar<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        jar: &JarInstruction,
        resources: &ResourcesInstruction,
        app: Option<&ApplicationInstruction>,
    ) -> Result<(), WriteError> {
        let classes = path_str(&resources.classes_dir);

        if jar.css_to_bin {
            let mut css = BytesStart::new("fx:csstobin");
            css.push_attribute(("outdir", classes.as_str()));
            writer.write_event(Event::Start(css))?;
            self.write_fileset(writer, "fileset", &FileSet::new(&resources.classes_dir, "**/*.css"))?;
            writer.write_event(Event::End(BytesEnd::new("fx:csstobin")))?;
        }

        let mut elem = BytesStart::new("fx:jar");
        elem.push_attribute(("destfile", path_str(&jar.dest_file).as_str()));
        writer.write_event(Event::Start(elem))?;

        self.write_application_ref(writer, &jar.application_ref)?;

        let mut res = BytesStart::new("fx:resources");
        res.push_attribute(("refid", jar.resources_ref.as_str()));
        writer.write_event(Event::Empty(res))?;

        self.write_platform(writer, app)?;

        let mut fileset = BytesStart::new("fileset");
        fileset.push_attribute(("dir", classes.as_str()));
        writer.write_event(Event::Empty(fileset))?;

        writer.write_event(Event::End(BytesEnd::new("fx:jar")))?;
        Ok(())
    }

    fn write_sign<W: std::io::Write>(&self, writer: &mut Writer<W>, sign: &SignInstruction) -> Result<(), WriteError> {
        let creds = &sign.credentials;
        let mut elem = BytesStart::new("signjar");
        elem.push_attribute(("keystore", path_str(&creds.key_store).as_str()));
        elem.push_attribute(("storepass", creds.store_pass.as_str()));
        elem.push_attribute(("alias", creds.alias.as_str()));
        elem.push_attribute(("keypass", creds.key_pass.as_str()));
        elem.push_attribute(("storetype", creds.store_type.as_str()));

        match &sign.target {
            SignTarget::Jar(jar) => {
                elem.push_attribute(("jar", path_str(jar).as_str()));
                writer.write_event(Event::Empty(elem))?;
            }
            SignTarget::Directory(set) => {
                writer.write_event(Event::Start(elem))?;
                self.write_fileset(writer, "fileset", set)?;
                writer.write_event(Event::End(BytesEnd::new("signjar")))?;
            }
        }
        Ok(())
    }

    fn write_deploy<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        deploy: &DeployInstruction,
        app: Option<&ApplicationInstruction>,
    ) -> Result<(), WriteError> {
        let mut elem = BytesStart::new("fx:deploy");
        elem.push_attribute(("width", deploy.dimensions.width.to_string().as_str()));
        elem.push_attribute(("height", deploy.dimensions.height.to_string().as_str()));
        elem.push_attribute(("embeddedWidth", deploy.dimensions.embedded_width.as_str()));
        elem.push_attribute(("embeddedHeight", deploy.dimensions.embedded_height.as_str()));
        elem.push_attribute(("outdir", path_str(&deploy.out_dir).as_str()));
        elem.push_attribute(("outfile", deploy.out_file.as_str()));
        elem.push_attribute(("nativeBundles", deploy.native_bundles.as_str()));
        if let Some(ref template) = deploy.template {
            elem.push_attribute(("placeholderId", template.placeholder_id.as_str()));
        }
        if deploy.verbose {
            elem.push_attribute(("verbose", "true"));
        }
        writer.write_event(Event::Start(elem))?;

        let mut info = BytesStart::new("fx:info");
        info.push_attribute(("title", deploy.info.title.as_str()));
        if let Some(ref vendor) = deploy.info.vendor {
            info.push_attribute(("vendor", vendor.as_str()));
        }
        if let Some(ref description) = deploy.info.description {
            info.push_attribute(("description", description.as_str()));
        }
        writer.write_event(Event::Empty(info))?;

        let mut permissions = BytesStart::new("fx:permissions");
        permissions.push_attribute(("elevated", bool_str(deploy.permissions.elevated)));
        permissions.push_attribute(("cacheCertificates", bool_str(deploy.permissions.cache_certificates)));
        writer.write_event(Event::Empty(permissions))?;

        self.write_platform(writer, app)?;
        self.write_application_ref(writer, &deploy.application_ref)?;

        writer.write_event(Event::Start(BytesStart::new("fx:resources")))?;
        for set in &deploy.resources {
            self.write_fileset(writer, "fx:fileset", set)?;
        }
        writer.write_event(Event::End(BytesEnd::new("fx:resources")))?;

        if let Some(ref template) = deploy.template {
            let mut elem = BytesStart::new("fx:template");
            elem.push_attribute(("file", path_str(&template.file).as_str()));
            elem.push_attribute(("tofile", path_str(&template.dest_file).as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("fx:deploy")))?;
        Ok(())
    }
}

impl Default for BuildfileWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::tests::{config, elevated};
    use crate::builder::DescriptorBuilder;
    use std::path::PathBuf;

    fn write(config: &fxpack_core::PackagingConfig) -> String {
        let descriptor = DescriptorBuilder::new(config).build(
            &[PathBuf::from("/repo/guava.jar"), PathBuf::from("/jdk/jfxrt.jar")],
            Path::new("/work/classes"),
            Path::new("/work/target"),
        );
        BuildfileWriter::new().write_to_string(&descriptor).unwrap()
    }

    #[test]
    fn test_write_basic_buildfile() {
        let xml = write(&config("demo"));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:fx=\"javafx:com.sun.javafx.tools.ant\""));
        assert!(xml.contains("classpath=\"/opt/jdk/lib/ant-javafx.jar\""));
        assert!(xml.contains("<fx:application id=\"demo\" name=\"demo\" mainClass=\"demo.Main\"/>"));
        assert!(xml.contains("<fx:fileset dir=\"/work/target\" includes=\"lib/guava.jar\"/>"));
        assert!(xml.contains("<fx:jar destfile=\"/work/target/demo/demo.jar\">"));
        assert!(xml.contains("<fileset dir=\"/work/classes\"/>"));
        assert!(xml.contains("width=\"800\" height=\"600\" embeddedWidth=\"100%\" embeddedHeight=\"100%\""));
        assert!(xml.contains("<fx:permissions elevated=\"false\" cacheCertificates=\"false\"/>"));
        assert!(!xml.contains("jfxrt"));
        assert!(!xml.contains("signjar"));
        assert!(!xml.contains("fx:template"));
        assert!(!xml.contains("fx:csstobin"));
    }

    #[test]
    fn test_write_signing() {
        let xml = write(&elevated(config("demo")));

        assert_eq!(xml.matches("<signjar ").count(), 2);
        assert!(xml.contains("jar=\"/work/target/demo/demo.jar\""));
        assert!(xml.contains("<fileset dir=\"/work/target/lib\" includes=\"*.jar\"/>"));
        assert!(xml.contains("storetype=\"jks\""));
        assert!(xml.contains("elevated=\"true\""));
        assert!(xml.find("<signjar").unwrap() > xml.find("</fx:jar>").unwrap());
        assert!(xml.find("<fx:deploy").unwrap() > xml.rfind("signjar").unwrap());
    }

    #[test]
    fn test_write_template_and_extras() {
        let mut config = config("demo");
        config.template.file = Some(PathBuf::from("/project/index.html"));
        config.template.dest_file = Some(PathBuf::from("/abs/out.html"));
        config.template.placeholder_id = "app".into();
        config.misc.css_to_bin = true;
        config.misc.jvm_options.push("-Xmx1g".into());
        config.info.vendor = Some("Demo & Co".into());

        let xml = write(&config);
        assert!(xml.contains("placeholderId=\"app\""));
        assert!(xml.contains("<fx:template file=\"/project/index.html\" tofile=\"/abs/out.html\"/>"));
        assert!(xml.contains("<fx:csstobin outdir=\"/work/classes\">"));
        assert_eq!(xml.matches("<fx:jvmarg value=\"-Xmx1g\"/>").count(), 2);
        assert!(xml.contains("vendor=\"Demo &amp; Co\""));
    }

    #[test]
    fn test_output_is_byte_identical() {
        let config = elevated(config("demo"));
        assert_eq!(write(&config), write(&config));
    }

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config("demo");
        let descriptor = DescriptorBuilder::new(&config).build(&[], Path::new("/c"), dir.path());

        BuildfileWriter::new()
            .write_to_file(&descriptor, &descriptor.layout.buildfile)
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join("build.xml")).unwrap();
        assert!(content.contains("<project name=\"demo\""));
    }
}
