//! ARM Crosstools
//!
//! Toolchain records for arm64-v8a and the 32-bit ARM EABI CPU variants.
//! Flag values follow the `setup.mk` files of the NDK r10e toolchain
//! directories.
//!
//! Records come out in NDK release order, not alphabetically:
//!
//! ```text
//! aarch64-linux-android-4.9
//! aarch64-linux-android-clang3.5
//! aarch64-linux-android-clang3.6
//! arm-linux-androideabi-4.8[-v7a[-hard]][-thumb]
//! arm-linux-androideabi-4.9[-v7a[-hard]][-thumb]
//! arm-linux-androideabi-clang3.5[-v7a[-hard]][-thumb]
//! arm-linux-androideabi-clang3.6[-v7a[-hard]][-thumb]
//! ```

use std::collections::BTreeSet;
use tracing::debug;

use crate::ndk::{NdkError, NdkPaths};
use crate::toolchain::{CompilationModeFlags, Tool, ToolPath, ToolchainConfig};

const AARCH64_TOOLCHAIN: &str = "aarch64-linux-android-4.9";
const AARCH64_PLATFORM: &str = "aarch64-linux-android";
const AARCH64_GCC_VERSION: &str = "4.9";
const AARCH64_LLVM_TRIPLE: &str = "aarch64-none-linux-android";
const AARCH64_CPU: &str = "arm64-v8a";

const ARMEABI_PLATFORM: &str = "arm-linux-androideabi";

/// Clang front ends shipped with the NDK
pub const CLANG_VERSIONS: &[&str] = &["3.5", "3.6"];

/// A gcc release the ARM EABI toolchains are built for
struct GccRelease {
    version: &'static str,
    stack_protector: &'static str,
    excluded_tools: &'static [Tool],
}

const ARMEABI_GCC_RELEASES: &[GccRelease] = &[
    // gcc-4.8 for arm has no gcov-tool
    GccRelease {
        version: "4.8",
        stack_protector: "-fstack-protector",
        excluded_tools: &[Tool::GcovTool],
    },
    GccRelease {
        version: "4.9",
        stack_protector: "-fstack-protector-strong",
        excluded_tools: &[],
    },
];

/// The ARM EABI clang front ends drive this gcc release
const ARMEABI_CLANG_BACKEND: &GccRelease = &ARMEABI_GCC_RELEASES[0];

const AARCH64_GCC_FLAGS: &[&str] = &[
    "-fpic",
    "-ffunction-sections",
    "-funwind-tables",
    "-fstack-protector-strong",
    "-no-canonical-prefixes",
];

const AARCH64_CLANG_FLAGS: &[&str] = &[
    "-ffunction-sections",
    "-funwind-tables",
    "-fstack-protector-strong",
    "-fpic",
    "-Wno-invalid-command-line-argument",
    "-Wno-unused-command-line-argument",
    "-no-canonical-prefixes",
];

/// Follows the version keyed stack protector flag
const ARMEABI_GCC_FLAGS: &[&str] = &[
    "-fpic",
    "-ffunction-sections",
    "-funwind-tables",
    "-no-canonical-prefixes",
];

const ARMEABI_CLANG_FLAGS: &[&str] = &[
    "-fpic",
    "-ffunction-sections",
    "-funwind-tables",
    "-fstack-protector-strong",
    "-Wno-invalid-command-line-argument",
    "-Wno-unused-command-line-argument",
    "-no-canonical-prefixes",
    // gcc-4.8 binutils and the integrated assembler disagree
    "-fno-integrated-as",
];

const COMMON_LINKER_FLAGS: &[&str] = &["-no-canonical-prefixes"];

/// Flag deltas for one ARM EABI CPU variant
struct CpuVariant {
    suffix: &'static str,
    target_cpu: &'static str,
    /// Passed as `-target` to clang, both when compiling and linking
    llvm_triple: Option<&'static str>,
    compiler_flags: &'static [&'static str],
    linker_flags: &'static [&'static str],
}

const GCC_CPU_VARIANTS: &[CpuVariant] = &[
    CpuVariant {
        suffix: "",
        target_cpu: "armeabi",
        llvm_triple: None,
        compiler_flags: &["-march=armv5te", "-mtune=xscale", "-msoft-float"],
        linker_flags: &[],
    },
    CpuVariant {
        suffix: "-v7a",
        target_cpu: "armeabi-v7a",
        llvm_triple: None,
        compiler_flags: &["-march=armv7-a", "-mfpu=vfpv3-d16", "-mfloat-abi=softfp"],
        linker_flags: &["-march=armv7-a", "-Wl,--fix-cortex-a8"],
    },
    CpuVariant {
        suffix: "-v7a-hard",
        target_cpu: "armeabi-v7a-hard",
        llvm_triple: None,
        compiler_flags: &[
            "-march=armv7-a",
            "-mfpu=vfpv3-d16",
            "-mhard-float",
            "-D_NDK_MATH_NO_SOFTFP=1",
        ],
        linker_flags: &[
            "-march=armv7-a",
            "-Wl,--fix-cortex-a8",
            "-Wl,--no-warn-mismatch",
            "-lm_hard",
        ],
    },
];

const CLANG_CPU_VARIANTS: &[CpuVariant] = &[
    CpuVariant {
        suffix: "",
        target_cpu: "armeabi",
        llvm_triple: Some("armv5te-none-linux-androideabi"),
        compiler_flags: &["-march=armv5te", "-mtune=xscale", "-msoft-float"],
        linker_flags: &[],
    },
    CpuVariant {
        suffix: "-v7a",
        target_cpu: "armeabi-v7a",
        llvm_triple: Some("armv7-none-linux-androideabi"),
        compiler_flags: &["-march=armv7-a", "-mfloat-abi=softfp", "-mfpu=vfpv3-d16"],
        linker_flags: &["-Wl,--fix-cortex-a8"],
    },
    CpuVariant {
        suffix: "-v7a-hard",
        target_cpu: "armeabi-v7a-hard",
        llvm_triple: Some("armv7-none-linux-androideabi"),
        compiler_flags: &[
            "-march=armv7-a",
            "-mfpu=vfpv3-d16",
            "-mhard-float",
            "-D_NDK_MATH_NO_SOFTFP=1",
        ],
        linker_flags: &["-Wl,--fix-cortex-a8", "-Wl,--no-warn-mismatch", "-lm_hard"],
    },
];

/// Release and debug overlays
struct ModeTable {
    opt: &'static [&'static str],
    dbg: &'static [&'static str],
}

impl ModeTable {
    fn to_flags(&self) -> CompilationModeFlags {
        CompilationModeFlags::new(self.opt, self.dbg)
    }
}

const AARCH64_GCC_MODES: ModeTable = ModeTable {
    opt: GCC_ARM_MODES.opt,
    dbg: &["-O0", "-UNDEBUG", "-fno-omit-frame-pointer", "-fno-strict-aliasing"],
};

const AARCH64_CLANG_MODES: ModeTable = ModeTable {
    opt: CLANG_ARM_MODES.opt,
    dbg: AARCH64_GCC_MODES.dbg,
};

const GCC_ARM_MODES: ModeTable = ModeTable {
    opt: &[
        "-O2",
        "-g",
        "-DNDEBUG",
        "-fomit-frame-pointer",
        "-fstrict-aliasing",
        "-funswitch-loops",
        "-finline-limit=300",
    ],
    dbg: &[
        "-g",
        "-funswitch-loops",
        "-finline-limit=300",
        "-O0",
        "-UNDEBUG",
        "-fno-omit-frame-pointer",
        "-fno-strict-aliasing",
    ],
};

// Thumb builds optimize for size and debug in ARM encoding
const GCC_THUMB_MODES: ModeTable = ModeTable {
    opt: &[
        "-mthumb",
        "-Os",
        "-g",
        "-DNDEBUG",
        "-fomit-frame-pointer",
        "-fno-strict-aliasing",
        "-finline-limit=64",
    ],
    dbg: &[
        "-g",
        "-fno-strict-aliasing",
        "-finline-limit=64",
        "-O0",
        "-UNDEBUG",
        "-marm",
        "-fno-omit-frame-pointer",
    ],
};

const CLANG_ARM_MODES: ModeTable = ModeTable {
    opt: &["-O2", "-g", "-DNDEBUG", "-fomit-frame-pointer", "-fstrict-aliasing"],
    dbg: &["-g", "-O0", "-UNDEBUG", "-fno-omit-frame-pointer", "-fno-strict-aliasing"],
};

const CLANG_THUMB_MODES: ModeTable = ModeTable {
    opt: &["-mthumb", "-Os", "-g", "-DNDEBUG", "-fomit-frame-pointer", "-fno-strict-aliasing"],
    dbg: &["-g", "-fno-strict-aliasing", "-O0", "-UNDEBUG", "-marm", "-fno-omit-frame-pointer"],
};

/// Compiler front end of an ARM EABI toolchain
#[derive(Clone, Copy)]
enum ArmeabiFrontEnd {
    Gcc(&'static GccRelease),
    Clang(&'static str),
}

impl ArmeabiFrontEnd {
    fn backend(self) -> &'static GccRelease {
        match self {
            ArmeabiFrontEnd::Gcc(release) => release,
            ArmeabiFrontEnd::Clang(_) => ARMEABI_CLANG_BACKEND,
        }
    }

    fn name_stem(self) -> String {
        match self {
            ArmeabiFrontEnd::Gcc(release) => format!("{}-{}", ARMEABI_PLATFORM, release.version),
            ArmeabiFrontEnd::Clang(version) => format!("{}-clang{}", ARMEABI_PLATFORM, version),
        }
    }

    fn cpu_variants(self) -> &'static [CpuVariant] {
        match self {
            ArmeabiFrontEnd::Gcc(_) => GCC_CPU_VARIANTS,
            ArmeabiFrontEnd::Clang(_) => CLANG_CPU_VARIANTS,
        }
    }

    fn modes(self, thumb: bool) -> &'static ModeTable {
        match (self, thumb) {
            (ArmeabiFrontEnd::Gcc(_), false) => &GCC_ARM_MODES,
            (ArmeabiFrontEnd::Gcc(_), true) => &GCC_THUMB_MODES,
            (ArmeabiFrontEnd::Clang(_), false) => &CLANG_ARM_MODES,
            (ArmeabiFrontEnd::Clang(_), true) => &CLANG_THUMB_MODES,
        }
    }
}

/// Builds the ARM toolchain records
pub struct ArmCrosstools<'a> {
    ndk_paths: &'a dyn NdkPaths,
}

impl<'a> ArmCrosstools<'a> {
    pub fn new(ndk_paths: &'a dyn NdkPaths) -> Self {
        Self { ndk_paths }
    }

    /// Create every ARM toolchain record.
    ///
    /// Fails only when the path collaborator does; its error is returned
    /// unchanged and no records are produced.
    pub fn create_crosstools(&self) -> Result<Vec<ToolchainConfig>, NdkError> {
        let mut toolchains = vec![self.aarch64_toolchain()?];

        for clang_version in CLANG_VERSIONS {
            toolchains.push(self.aarch64_clang_toolchain(clang_version)?);
        }

        let front_ends = ARMEABI_GCC_RELEASES
            .iter()
            .map(ArmeabiFrontEnd::Gcc)
            .chain(CLANG_VERSIONS.iter().map(|v| ArmeabiFrontEnd::Clang(*v)));

        for front_end in front_ends {
            for thumb in [false, true] {
                self.add_armeabi_toolchains(&mut toolchains, front_end, thumb)?;
            }
        }

        debug!("Created {} ARM toolchains", toolchains.len());
        Ok(toolchains)
    }

    fn aarch64_toolchain(&self) -> Result<ToolchainConfig, NdkError> {
        let tool_paths = self
            .ndk_paths
            .tool_paths(AARCH64_TOOLCHAIN, AARCH64_PLATFORM, &BTreeSet::new())?;

        let mut toolchain = self.base_record(
            AARCH64_TOOLCHAIN,
            AARCH64_PLATFORM,
            AARCH64_GCC_VERSION,
            "arm64",
            tool_paths,
        )?;
        toolchain.toolchain_identifier = AARCH64_TOOLCHAIN.to_string();
        toolchain.target_cpu = AARCH64_CPU.to_string();
        toolchain.add_compiler_flags(AARCH64_GCC_FLAGS);
        toolchain.add_linker_flags(COMMON_LINKER_FLAGS);
        toolchain.compilation_mode_flags = AARCH64_GCC_MODES.to_flags();

        debug!("Created toolchain {}", toolchain.toolchain_identifier);
        Ok(toolchain)
    }

    /// Clang 3.5 and 3.6 share flags; only their tool paths differ
    fn aarch64_clang_toolchain(&self, clang_version: &str) -> Result<ToolchainConfig, NdkError> {
        let tool_paths = self.ndk_paths.clang_tool_paths(
            AARCH64_TOOLCHAIN,
            AARCH64_PLATFORM,
            clang_version,
            &BTreeSet::new(),
        )?;
        let driver_flags = clang_driver_flags(
            &self.ndk_paths.gcc_toolchain_path(AARCH64_TOOLCHAIN)?,
            Some(AARCH64_LLVM_TRIPLE),
        );

        let mut toolchain = self.base_record(
            AARCH64_TOOLCHAIN,
            AARCH64_PLATFORM,
            AARCH64_GCC_VERSION,
            "arm64",
            tool_paths,
        )?;
        toolchain.toolchain_identifier = format!("{}-clang{}", AARCH64_PLATFORM, clang_version);
        toolchain.target_cpu = AARCH64_CPU.to_string();
        toolchain.add_compiler_flags(&driver_flags);
        toolchain.add_compiler_flags(AARCH64_CLANG_FLAGS);
        toolchain.add_linker_flags(&driver_flags);
        toolchain.add_linker_flags(COMMON_LINKER_FLAGS);
        toolchain.compilation_mode_flags = AARCH64_CLANG_MODES.to_flags();

        debug!("Created toolchain {}", toolchain.toolchain_identifier);
        Ok(toolchain)
    }

    /// Adds the armeabi, armeabi-v7a and armeabi-v7a-hard records for one
    /// front end and instruction mode
    fn add_armeabi_toolchains(
        &self,
        toolchains: &mut Vec<ToolchainConfig>,
        front_end: ArmeabiFrontEnd,
        thumb: bool,
    ) -> Result<(), NdkError> {
        let base = self.armeabi_base(front_end, thumb)?;
        let stem = front_end.name_stem();

        for variant in front_end.cpu_variants() {
            let mut toolchain = base.clone();
            toolchain.toolchain_identifier = armeabi_name(&stem, variant.suffix, thumb);
            toolchain.target_cpu = variant.target_cpu.to_string();

            if let Some(triple) = variant.llvm_triple {
                toolchain.add_compiler_flags(&["-target", triple]);
            }
            toolchain.add_compiler_flags(variant.compiler_flags);

            if let Some(triple) = variant.llvm_triple {
                toolchain.add_linker_flags(&["-target", triple]);
            }
            toolchain.add_linker_flags(variant.linker_flags);

            debug!("Created toolchain {}", toolchain.toolchain_identifier);
            toolchains.push(toolchain);
        }

        Ok(())
    }

    /// Flags common to every arm-linux-androideabi CPU variant
    fn armeabi_base(
        &self,
        front_end: ArmeabiFrontEnd,
        thumb: bool,
    ) -> Result<ToolchainConfig, NdkError> {
        let backend = front_end.backend();
        let toolchain_name = format!("{}-{}", ARMEABI_PLATFORM, backend.version);
        let excluded: BTreeSet<Tool> = backend.excluded_tools.iter().copied().collect();

        let tool_paths = match front_end {
            ArmeabiFrontEnd::Gcc(_) => {
                self.ndk_paths
                    .tool_paths(&toolchain_name, ARMEABI_PLATFORM, &excluded)?
            }
            ArmeabiFrontEnd::Clang(clang_version) => self.ndk_paths.clang_tool_paths(
                &toolchain_name,
                ARMEABI_PLATFORM,
                clang_version,
                &excluded,
            )?,
        };

        let mut toolchain = self.base_record(
            &toolchain_name,
            ARMEABI_PLATFORM,
            backend.version,
            "arm",
            tool_paths,
        )?;

        match front_end {
            ArmeabiFrontEnd::Gcc(release) => {
                toolchain.add_compiler_flags(&[release.stack_protector]);
                toolchain.add_compiler_flags(ARMEABI_GCC_FLAGS);
                toolchain.add_linker_flags(COMMON_LINKER_FLAGS);
            }
            ArmeabiFrontEnd::Clang(_) => {
                // The -target pair depends on the CPU variant
                let driver_flags =
                    clang_driver_flags(&self.ndk_paths.gcc_toolchain_path(&toolchain_name)?, None);
                toolchain.add_compiler_flags(&driver_flags);
                toolchain.add_compiler_flags(ARMEABI_CLANG_FLAGS);
                toolchain.add_linker_flags(&driver_flags);
                toolchain.add_linker_flags(COMMON_LINKER_FLAGS);
            }
        }

        toolchain.compilation_mode_flags = front_end.modes(thumb).to_flags();
        Ok(toolchain)
    }

    /// Record fields every toolchain fills from the NDK layout
    fn base_record(
        &self,
        toolchain_name: &str,
        target_platform: &str,
        gcc_version: &str,
        arch: &str,
        tool_paths: Vec<ToolPath>,
    ) -> Result<ToolchainConfig, NdkError> {
        Ok(ToolchainConfig {
            target_system_name: target_platform.to_string(),
            compiler: format!("gcc-{}", gcc_version),
            tool_paths,
            cxx_builtin_include_directories: self.ndk_paths.toolchain_include_paths(
                toolchain_name,
                target_platform,
                gcc_version,
            )?,
            builtin_sysroot: self.ndk_paths.builtin_sysroot(arch)?,
            supports_embedded_runtimes: true,
            static_runtimes_filegroup: format!("static-runtime-libs-{}", toolchain_name),
            dynamic_runtimes_filegroup: format!("dynamic-runtime-libs-{}", toolchain_name),
            ..Default::default()
        })
    }
}

/// CPU tags the ARM records target, in record order
pub fn target_cpus() -> Vec<&'static str> {
    let mut cpus = vec![AARCH64_CPU];
    cpus.extend(GCC_CPU_VARIANTS.iter().map(|v| v.target_cpu));
    cpus
}

fn armeabi_name(stem: &str, suffix: &str, thumb: bool) -> String {
    let thumb = if thumb { "-thumb" } else { "" };
    format!("{}{}{}", stem, suffix, thumb)
}

fn clang_driver_flags(gcc_toolchain: &str, llvm_triple: Option<&str>) -> Vec<String> {
    let mut flags = vec!["-gcc-toolchain".to_string(), gcc_toolchain.to_string()];
    if let Some(triple) = llvm_triple {
        flags.push("-target".to_string());
        flags.push(triple.to_string());
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::CompilationMode;
    use std::collections::HashSet;

    /// Deterministic paths that make the calling arguments visible
    struct FixturePaths;

    impl NdkPaths for FixturePaths {
        fn tool_paths(
            &self,
            toolchain_name: &str,
            target_platform: &str,
            excluded: &BTreeSet<Tool>,
        ) -> Result<Vec<ToolPath>, NdkError> {
            Ok(Tool::all()
                .iter()
                .filter(|t| !excluded.contains(*t))
                .map(|t| {
                    ToolPath::new(
                        *t,
                        format!("fixture/{}/{}-{}", toolchain_name, target_platform, t.name_part()),
                    )
                })
                .collect())
        }

        fn clang_tool_paths(
            &self,
            toolchain_name: &str,
            target_platform: &str,
            clang_version: &str,
            excluded: &BTreeSet<Tool>,
        ) -> Result<Vec<ToolPath>, NdkError> {
            let mut paths: Vec<ToolPath> = self
                .tool_paths(toolchain_name, target_platform, excluded)?
                .into_iter()
                .filter(|tp| tp.tool != Tool::Gcc)
                .collect();
            paths.push(ToolPath::new(Tool::Gcc, format!("fixture/llvm-{}/clang", clang_version)));
            Ok(paths)
        }

        fn toolchain_include_paths(
            &self,
            toolchain_name: &str,
            _target_platform: &str,
            gcc_version: &str,
        ) -> Result<Vec<String>, NdkError> {
            Ok(vec![format!("fixture/{}/include/{}", toolchain_name, gcc_version)])
        }

        fn builtin_sysroot(&self, arch: &str) -> Result<String, NdkError> {
            Ok(format!("fixture/sysroot/arch-{}", arch))
        }

        fn gcc_toolchain_path(&self, toolchain_name: &str) -> Result<String, NdkError> {
            Ok(format!("fixture/{}", toolchain_name))
        }
    }

    /// Rejects the 32-bit ARM sysroot
    struct NoArmSysroot;

    impl NdkPaths for NoArmSysroot {
        fn tool_paths(&self, a: &str, b: &str, e: &BTreeSet<Tool>) -> Result<Vec<ToolPath>, NdkError> {
            FixturePaths.tool_paths(a, b, e)
        }

        fn clang_tool_paths(
            &self,
            a: &str,
            b: &str,
            v: &str,
            e: &BTreeSet<Tool>,
        ) -> Result<Vec<ToolPath>, NdkError> {
            FixturePaths.clang_tool_paths(a, b, v, e)
        }

        fn toolchain_include_paths(&self, a: &str, b: &str, v: &str) -> Result<Vec<String>, NdkError> {
            FixturePaths.toolchain_include_paths(a, b, v)
        }

        fn builtin_sysroot(&self, arch: &str) -> Result<String, NdkError> {
            match arch {
                "arm" => Err(NdkError::UnknownArch(arch.to_string())),
                _ => FixturePaths.builtin_sysroot(arch),
            }
        }

        fn gcc_toolchain_path(&self, name: &str) -> Result<String, NdkError> {
            FixturePaths.gcc_toolchain_path(name)
        }
    }

    fn crosstools() -> Vec<ToolchainConfig> {
        ArmCrosstools::new(&FixturePaths).create_crosstools().unwrap()
    }

    fn find<'t>(toolchains: &'t [ToolchainConfig], id: &str) -> &'t ToolchainConfig {
        toolchains
            .iter()
            .find(|t| t.toolchain_identifier == id)
            .unwrap_or_else(|| panic!("missing toolchain {}", id))
    }

    fn position(flags: &[String], flag: &str) -> usize {
        flags
            .iter()
            .position(|f| f == flag)
            .unwrap_or_else(|| panic!("missing flag {}", flag))
    }

    #[test]
    fn test_toolchain_identifiers_in_release_order() {
        let ids: Vec<String> = crosstools()
            .into_iter()
            .map(|t| t.toolchain_identifier)
            .collect();

        let mut expected = vec![
            "aarch64-linux-android-4.9".to_string(),
            "aarch64-linux-android-clang3.5".to_string(),
            "aarch64-linux-android-clang3.6".to_string(),
        ];
        for stem in ["4.8", "4.9", "clang3.5", "clang3.6"] {
            for thumb in ["", "-thumb"] {
                for cpu in ["", "-v7a", "-v7a-hard"] {
                    expected.push(format!("arm-linux-androideabi-{}{}{}", stem, cpu, thumb));
                }
            }
        }

        assert_eq!(ids.len(), 27);
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_identifiers_are_unique() {
        let toolchains = crosstools();
        let ids: HashSet<&str> = toolchains
            .iter()
            .map(|t| t.toolchain_identifier.as_str())
            .collect();
        assert_eq!(ids.len(), toolchains.len());
    }

    #[test]
    fn test_every_record_has_both_modes() {
        for toolchain in crosstools() {
            for mode in CompilationMode::all() {
                assert!(
                    !toolchain.mode_flags(*mode).is_empty(),
                    "{} has no {} flags",
                    toolchain.toolchain_identifier,
                    mode.as_str()
                );
            }
            assert!(toolchain.supports_embedded_runtimes);
        }
    }

    #[test]
    fn test_hard_float_variants_link_libm_hard() {
        let toolchains = crosstools();
        let hard: Vec<_> = toolchains
            .iter()
            .filter(|t| t.target_cpu == "armeabi-v7a-hard")
            .collect();

        assert_eq!(hard.len(), 8);
        for toolchain in hard {
            assert!(toolchain.linker_flags.contains(&"-lm_hard".to_string()));
            assert!(toolchain.linker_flags.contains(&"-Wl,--fix-cortex-a8".to_string()));
            assert!(toolchain.linker_flags.contains(&"-Wl,--no-warn-mismatch".to_string()));
            assert!(toolchain
                .compiler_flags
                .contains(&"-D_NDK_MATH_NO_SOFTFP=1".to_string()));
        }
    }

    #[test]
    fn test_thumb_release_optimizes_for_size() {
        let toolchains = crosstools();
        let thumb: Vec<_> = toolchains
            .iter()
            .filter(|t| t.toolchain_identifier.ends_with("-thumb"))
            .collect();

        assert_eq!(thumb.len(), 12);
        for toolchain in thumb {
            let opt = toolchain.mode_flags(CompilationMode::Opt);
            assert!(opt.contains(&"-mthumb".to_string()));
            assert!(opt.contains(&"-Os".to_string()));
            assert!(!opt.contains(&"-O2".to_string()));

            let dbg = toolchain.mode_flags(CompilationMode::Dbg);
            assert!(dbg.contains(&"-marm".to_string()));
        }

        let arm = find(&toolchains, "arm-linux-androideabi-4.9-v7a");
        assert_eq!(arm.mode_flags(CompilationMode::Opt)[0], "-O2");
        assert!(arm
            .mode_flags(CompilationMode::Opt)
            .contains(&"-finline-limit=300".to_string()));
        assert!(find(&toolchains, "arm-linux-androideabi-4.9-v7a-thumb")
            .mode_flags(CompilationMode::Opt)
            .contains(&"-finline-limit=64".to_string()));
    }

    #[test]
    fn test_stack_protector_follows_gcc_version() {
        let toolchains = crosstools();
        let gcc48 = find(&toolchains, "arm-linux-androideabi-4.8");
        let gcc49 = find(&toolchains, "arm-linux-androideabi-4.9");

        assert_eq!(gcc48.compiler_flags[0], "-fstack-protector");
        assert_eq!(gcc49.compiler_flags[0], "-fstack-protector-strong");
        assert_eq!(gcc48.compiler_flags[1..], gcc49.compiler_flags[1..]);
        assert_eq!(gcc48.linker_flags, gcc49.linker_flags);
        assert_eq!(gcc48.compilation_mode_flags, gcc49.compilation_mode_flags);
    }

    #[test]
    fn test_first_armeabi_record() {
        let toolchains = crosstools();
        let armeabi = &toolchains[3];

        assert_eq!(armeabi.toolchain_identifier, "arm-linux-androideabi-4.8");
        assert_eq!(armeabi.target_cpu, "armeabi");
        assert_eq!(armeabi.compiler, "gcc-4.8");
        assert_eq!(armeabi.target_system_name, "arm-linux-androideabi");
        assert_eq!(armeabi.builtin_sysroot, "fixture/sysroot/arch-arm");
        assert_eq!(
            armeabi.static_runtimes_filegroup,
            "static-runtime-libs-arm-linux-androideabi-4.8"
        );

        let flags = &armeabi.compiler_flags;
        let march = position(flags, "-march=armv5te");
        let mtune = position(flags, "-mtune=xscale");
        let soft = position(flags, "-msoft-float");
        assert!(march < mtune && mtune < soft);
        assert_eq!(soft, flags.len() - 1);
    }

    #[test]
    fn test_v7a_flags() {
        let toolchains = crosstools();
        let v7a = find(&toolchains, "arm-linux-androideabi-4.9-v7a");

        assert_eq!(
            v7a.compiler_flags,
            vec![
                "-fstack-protector-strong",
                "-fpic",
                "-ffunction-sections",
                "-funwind-tables",
                "-no-canonical-prefixes",
                "-march=armv7-a",
                "-mfpu=vfpv3-d16",
                "-mfloat-abi=softfp",
            ]
        );
        assert_eq!(
            v7a.linker_flags,
            vec!["-no-canonical-prefixes", "-march=armv7-a", "-Wl,--fix-cortex-a8"]
        );
    }

    #[test]
    fn test_aarch64_records() {
        let toolchains = crosstools();
        let gcc = &toolchains[0];

        assert_eq!(gcc.target_cpu, "arm64-v8a");
        assert_eq!(gcc.builtin_sysroot, "fixture/sysroot/arch-arm64");
        assert_eq!(gcc.compiler_flags[0], "-fpic");
        assert!(gcc.compiler_flags.contains(&"-fstack-protector-strong".to_string()));
        assert_eq!(gcc.mode_flags(CompilationMode::Dbg)[0], "-O0");

        for clang in &toolchains[1..3] {
            assert_eq!(clang.compiler, "gcc-4.9");
            assert_eq!(
                clang.compiler_flags[..4],
                [
                    "-gcc-toolchain",
                    "fixture/aarch64-linux-android-4.9",
                    "-target",
                    "aarch64-none-linux-android",
                ]
            );
            assert_eq!(clang.linker_flags[..4], clang.compiler_flags[..4]);
            assert_eq!(clang.cxx_builtin_include_directories, gcc.cxx_builtin_include_directories);
            assert!(clang
                .compiler_flags
                .contains(&"-Wno-unused-command-line-argument".to_string()));
        }
        assert_eq!(
            toolchains[2].tool_path(Tool::Gcc),
            Some("fixture/llvm-3.6/clang")
        );
        assert!(toolchains[..3]
            .iter()
            .all(|t| !t.toolchain_identifier.contains("thumb")));
    }

    #[test]
    fn test_armeabi_clang_uses_gcc_48_backend() {
        let toolchains = crosstools();
        let clang = find(&toolchains, "arm-linux-androideabi-clang3.6-v7a-thumb");

        assert_eq!(clang.compiler, "gcc-4.8");
        assert_eq!(clang.tool_path(Tool::GcovTool), None);
        assert_eq!(clang.tool_path(Tool::Gcc), Some("fixture/llvm-3.6/clang"));
        assert!(clang.compiler_flags.contains(&"-fno-integrated-as".to_string()));
        assert_eq!(
            clang.linker_flags,
            vec![
                "-gcc-toolchain",
                "fixture/arm-linux-androideabi-4.8",
                "-no-canonical-prefixes",
                "-target",
                "armv7-none-linux-androideabi",
                "-Wl,--fix-cortex-a8",
            ]
        );
        assert_eq!(
            clang.mode_flags(CompilationMode::Opt),
            ["-mthumb", "-Os", "-g", "-DNDEBUG", "-fomit-frame-pointer", "-fno-strict-aliasing"]
        );
    }

    #[test]
    fn test_armeabi_clang_flag_order() {
        let toolchains = crosstools();

        let armeabi = find(&toolchains, "arm-linux-androideabi-clang3.5");
        assert_eq!(
            armeabi.compiler_flags,
            vec![
                "-gcc-toolchain",
                "fixture/arm-linux-androideabi-4.8",
                "-fpic",
                "-ffunction-sections",
                "-funwind-tables",
                "-fstack-protector-strong",
                "-Wno-invalid-command-line-argument",
                "-Wno-unused-command-line-argument",
                "-no-canonical-prefixes",
                "-fno-integrated-as",
                "-target",
                "armv5te-none-linux-androideabi",
                "-march=armv5te",
                "-mtune=xscale",
                "-msoft-float",
            ]
        );
        assert_eq!(
            armeabi.linker_flags,
            vec![
                "-gcc-toolchain",
                "fixture/arm-linux-androideabi-4.8",
                "-no-canonical-prefixes",
                "-target",
                "armv5te-none-linux-androideabi",
            ]
        );

        // clang takes the float ABI before the FPU, unlike gcc
        let v7a = find(&toolchains, "arm-linux-androideabi-clang3.5-v7a");
        assert_eq!(
            v7a.compiler_flags,
            vec![
                "-gcc-toolchain",
                "fixture/arm-linux-androideabi-4.8",
                "-fpic",
                "-ffunction-sections",
                "-funwind-tables",
                "-fstack-protector-strong",
                "-Wno-invalid-command-line-argument",
                "-Wno-unused-command-line-argument",
                "-no-canonical-prefixes",
                "-fno-integrated-as",
                "-target",
                "armv7-none-linux-androideabi",
                "-march=armv7-a",
                "-mfloat-abi=softfp",
                "-mfpu=vfpv3-d16",
            ]
        );
    }

    #[test]
    fn test_target_cpus_match_records() {
        let cpus = target_cpus();
        assert_eq!(cpus, ["arm64-v8a", "armeabi", "armeabi-v7a", "armeabi-v7a-hard"]);

        let produced: BTreeSet<String> = crosstools().into_iter().map(|t| t.target_cpu).collect();
        let listed: BTreeSet<String> = cpus.iter().map(|c| c.to_string()).collect();
        assert_eq!(produced, listed);
        assert!(CLANG_CPU_VARIANTS
            .iter()
            .all(|v| cpus.contains(&v.target_cpu)));
    }

    #[test]
    fn test_gcov_tool_excluded_only_for_gcc_48() {
        let toolchains = crosstools();

        assert_eq!(
            find(&toolchains, "arm-linux-androideabi-4.8-v7a").tool_path(Tool::GcovTool),
            None
        );
        assert!(find(&toolchains, "arm-linux-androideabi-4.9-v7a")
            .tool_path(Tool::GcovTool)
            .is_some());
        assert!(toolchains[0].tool_path(Tool::GcovTool).is_some());
    }

    #[test]
    fn test_tool_paths_come_from_collaborator() {
        for toolchain in crosstools() {
            let mut seen = HashSet::new();
            for tool_path in &toolchain.tool_paths {
                assert!(tool_path.path.starts_with("fixture/"));
                assert!(seen.insert(tool_path.tool), "duplicate {:?}", tool_path.tool);
            }
        }
    }

    #[test]
    fn test_creation_is_idempotent() {
        assert_eq!(crosstools(), crosstools());
    }

    #[test]
    fn test_collaborator_error_propagates() {
        let result = ArmCrosstools::new(&NoArmSysroot).create_crosstools();
        assert_eq!(result, Err(NdkError::UnknownArch("arm".to_string())));
    }
}
