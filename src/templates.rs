//! Project templates for `dvk create`.
//!
//! Every generated file is a fixed string in which the literal
//! [`PLACEHOLDER`] is replaced with the project name. No templating engine,
//! no escaping.
//!
//! | Type     | Sources                          | Makefile | CMake | autocc |
//! |----------|----------------------------------|----------|-------|--------|
//! | C        | `src/main.c`                     | gcc      | C     | cc     |
//! | C++      | `src/main.cpp`                   | g++      | CXX   | cxx    |
//! | Mixed    | `src/main.c`, `src/main.cpp`     | both     | C CXX | both   |
//! | Assembly | `src/main.s`                     | as/ld    | ASM   | as     |

use std::fmt;

/// Token substituted with the project name
pub const PLACEHOLDER: &str = "_PROJECT_NAME_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    C,
    Cpp,
    Mixed,
    Asm,
}

impl ProjectType {
    pub fn all() -> [ProjectType; 4] {
        [
            ProjectType::C,
            ProjectType::Cpp,
            ProjectType::Mixed,
            ProjectType::Asm,
        ]
    }

    /// Menu entry shown by the wizard
    pub fn description(&self) -> &'static str {
        match self {
            ProjectType::C => "C project (.c files, gcc)",
            ProjectType::Cpp => "C++ project (.cpp files, g++)",
            ProjectType::Mixed => "Mixed C/C++ project",
            ProjectType::Asm => "Assembly project (.s files)",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectType::C => "C",
            ProjectType::Cpp => "C++",
            ProjectType::Mixed => "Mixed C/C++",
            ProjectType::Asm => "Assembly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSystem {
    Make,
    CMake,
    Autocc,
    None,
}

impl BuildSystem {
    pub fn all() -> [BuildSystem; 4] {
        [
            BuildSystem::Make,
            BuildSystem::CMake,
            BuildSystem::Autocc,
            BuildSystem::None,
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuildSystem::Make => "Makefile (simple, traditional)",
            BuildSystem::CMake => "CMake (modern, cross-platform)",
            BuildSystem::Autocc => "autocc (minimal, fast and smart)",
            BuildSystem::None => "No build system (manual compilation)",
        }
    }

    /// Name of the build config file at the project root, if any
    pub fn config_file(&self) -> Option<&'static str> {
        match self {
            BuildSystem::Make => Some("Makefile"),
            BuildSystem::CMake => Some("CMakeLists.txt"),
            BuildSystem::Autocc => Some("autocc.toml"),
            BuildSystem::None => None,
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildSystem::Make => "Makefile",
            BuildSystem::CMake => "CMake",
            BuildSystem::Autocc => "autocc",
            BuildSystem::None => "None",
        };
        f.write_str(name)
    }
}

/// A file to write, relative to the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

impl GeneratedFile {
    fn new(path: &str, contents: String) -> Self {
        Self {
            path: path.to_string(),
            contents,
        }
    }
}

/// All files of a new project, in write order: sources, build config,
/// `.gitignore`, `README.md`.
pub fn project_files(name: &str, project_type: ProjectType, build: BuildSystem) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    match project_type {
        ProjectType::C => files.push(GeneratedFile::new("src/main.c", C_MAIN.to_string())),
        ProjectType::Cpp => files.push(GeneratedFile::new("src/main.cpp", CPP_MAIN.to_string())),
        // Only main.cpp defines `main`; main.c contributes a C-linkage helper.
        ProjectType::Mixed => {
            files.push(GeneratedFile::new("src/main.c", MIXED_C_PART.to_string()));
            files.push(GeneratedFile::new("src/main.cpp", MIXED_CPP_MAIN.to_string()));
        }
        ProjectType::Asm => files.push(GeneratedFile::new("src/main.s", ASM_MAIN.to_string())),
    }

    if let Some(config_file) = build.config_file() {
        let contents = match build {
            BuildSystem::Make => makefile(name, project_type),
            BuildSystem::CMake => cmake_lists(name, project_type),
            _ => autocc_toml(name, project_type),
        };
        files.push(GeneratedFile::new(config_file, contents));
    }

    files.push(GeneratedFile::new(".gitignore", substitute(GITIGNORE, name)));
    files.push(GeneratedFile::new("README.md", readme(name, project_type, build)));
    files
}

fn substitute(template: &str, name: &str) -> String {
    template.replace(PLACEHOLDER, name)
}

pub fn makefile(name: &str, project_type: ProjectType) -> String {
    let template = match project_type {
        ProjectType::C => MAKEFILE_C,
        ProjectType::Cpp => MAKEFILE_CPP,
        ProjectType::Mixed => MAKEFILE_MIXED,
        ProjectType::Asm => MAKEFILE_ASM,
    };
    substitute(template, name)
}

pub fn cmake_lists(name: &str, project_type: ProjectType) -> String {
    let template = match project_type {
        ProjectType::C => CMAKE_C,
        ProjectType::Cpp => CMAKE_CPP,
        ProjectType::Mixed => CMAKE_MIXED,
        ProjectType::Asm => CMAKE_ASM,
    };
    substitute(template, name)
}

pub fn autocc_toml(name: &str, project_type: ProjectType) -> String {
    let (main_file, sources) = match project_type {
        ProjectType::C => ("'./src/main.c'", "[ './src/main.c' ]"),
        ProjectType::Cpp => ("'./src/main.cpp'", "[ './src/main.cpp' ]"),
        // Linked through the C++ entry point
        ProjectType::Mixed => ("'./src/main.cpp'", "[ './src/main.c', './src/main.cpp' ]"),
        ProjectType::Asm => ("'./src/main.s'", "[ './src/main.s' ]"),
    };

    substitute(AUTOCC, name)
        .replace("_MAIN_FILE_", main_file)
        .replace("_SOURCES_", sources)
}

pub fn readme(name: &str, project_type: ProjectType, build: BuildSystem) -> String {
    let mut content = format!("# {}\n\n", PLACEHOLDER);
    content.push_str("A new project created with the dvk project wizard.\n\n");
    content.push_str("## Build\n\n");

    match build {
        BuildSystem::Make => {
            content.push_str("```bash\nmake\n```\n");
            content.push_str("\n## Run\n\n```bash\nmake run\n```\n");
            content.push_str("\n## Clean\n\n```bash\nmake clean\n```\n");
        }
        BuildSystem::CMake => {
            content.push_str("```bash\nmkdir -p build && cd build\ncmake ..\nmake\n```\n");
            content.push_str("\n## Run\n\n```bash\n./build/_PROJECT_NAME_\n```\n");
        }
        BuildSystem::Autocc => {
            content.push_str("```bash\nautocc\n```\n");
            content.push_str("\n## Run\n\n```bash\n./build/_PROJECT_NAME_\n```\n");
        }
        BuildSystem::None => {
            let compile = match project_type {
                ProjectType::C => "gcc src/main.c -o _PROJECT_NAME_",
                ProjectType::Cpp => "g++ src/main.cpp -o _PROJECT_NAME_",
                ProjectType::Mixed => {
                    "gcc -c src/main.c -o main_c.o\ng++ src/main.cpp main_c.o -o _PROJECT_NAME_"
                }
                ProjectType::Asm => "as src/main.s -o main.o\nld main.o -o _PROJECT_NAME_",
            };
            content.push_str(&format!("```bash\n{}\n```\n", compile));
            content.push_str("\n## Run\n\n```bash\n./_PROJECT_NAME_\n```\n");
        }
    }

    substitute(&content, name)
}

// -----------------------------------------------------------------------------
// Sources
// -----------------------------------------------------------------------------

const C_MAIN: &str = r#"#include <stdio.h>

int main(void) {
    printf("Hello, World!\n");
    return 0;
}
"#;

const CPP_MAIN: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello, World!" << std::endl;
    return 0;
}
"#;

const MIXED_C_PART: &str = r#"#include <stdio.h>

void hello_from_c(void) {
    printf("Hello from C!\n");
}
"#;

const MIXED_CPP_MAIN: &str = r#"#include <iostream>

extern "C" void hello_from_c(void);

int main() {
    std::cout << "Hello from C++!" << std::endl;
    hello_from_c();
    return 0;
}
"#;

const ASM_MAIN: &str = r#".section .data
    msg: .ascii "Hello, World!\n"
    msg_len = . - msg

.section .text
    .global _start

_start:
    # write(1, msg, msg_len)
    mov $1, %rax
    mov $1, %rdi
    mov $msg, %rsi
    mov $msg_len, %rdx
    syscall

    # exit(0)
    mov $60, %rax
    mov $0, %rdi
    syscall
"#;

// -----------------------------------------------------------------------------
// Makefiles
// -----------------------------------------------------------------------------

const MAKEFILE_C: &str = r#"CC = gcc
CFLAGS = -Wall -Wextra -std=c99 -g
TARGET = _PROJECT_NAME_
SRCDIR = src
OBJDIR = build
SOURCES = $(wildcard $(SRCDIR)/*.c)
OBJECTS = $(SOURCES:$(SRCDIR)/%.c=$(OBJDIR)/%.o)

.PHONY: all clean run debug install

all: $(OBJDIR) $(TARGET)

$(TARGET): $(OBJECTS)
	$(CC) $(OBJECTS) -o $@

$(OBJDIR)/%.o: $(SRCDIR)/%.c
	$(CC) $(CFLAGS) -c $< -o $@

$(OBJDIR):
	mkdir -p $(OBJDIR)

clean:
	rm -rf $(OBJDIR) $(TARGET)

run: all
	./$(TARGET)

debug: CFLAGS += -DDEBUG
debug: all

install: all
	cp $(TARGET) /usr/local/bin/
"#;

const MAKEFILE_CPP: &str = r#"CXX = g++
CXXFLAGS = -Wall -Wextra -std=c++17 -g
TARGET = _PROJECT_NAME_
SRCDIR = src
OBJDIR = build
SOURCES = $(wildcard $(SRCDIR)/*.cpp)
OBJECTS = $(SOURCES:$(SRCDIR)/%.cpp=$(OBJDIR)/%.o)

.PHONY: all clean run debug install

all: $(OBJDIR) $(TARGET)

$(TARGET): $(OBJECTS)
	$(CXX) $(OBJECTS) -o $@

$(OBJDIR)/%.o: $(SRCDIR)/%.cpp
	$(CXX) $(CXXFLAGS) -c $< -o $@

$(OBJDIR):
	mkdir -p $(OBJDIR)

clean:
	rm -rf $(OBJDIR) $(TARGET)

run: all
	./$(TARGET)

debug: CXXFLAGS += -DDEBUG
debug: all

install: all
	cp $(TARGET) /usr/local/bin/
"#;

// Object names carry the source extension so main.c and main.cpp don't collide.
const MAKEFILE_MIXED: &str = r#"CC = gcc
CXX = g++
CFLAGS = -Wall -Wextra -std=c99 -g
CXXFLAGS = -Wall -Wextra -std=c++17 -g
TARGET = _PROJECT_NAME_
SRCDIR = src
OBJDIR = build

C_SOURCES = $(wildcard $(SRCDIR)/*.c)
CXX_SOURCES = $(wildcard $(SRCDIR)/*.cpp)
OBJECTS = $(C_SOURCES:$(SRCDIR)/%.c=$(OBJDIR)/%.c.o) $(CXX_SOURCES:$(SRCDIR)/%.cpp=$(OBJDIR)/%.cpp.o)

.PHONY: all clean run debug install

all: $(OBJDIR) $(TARGET)

$(TARGET): $(OBJECTS)
	$(CXX) $(OBJECTS) -o $@

$(OBJDIR)/%.c.o: $(SRCDIR)/%.c
	$(CC) $(CFLAGS) -c $< -o $@

$(OBJDIR)/%.cpp.o: $(SRCDIR)/%.cpp
	$(CXX) $(CXXFLAGS) -c $< -o $@

$(OBJDIR):
	mkdir -p $(OBJDIR)

clean:
	rm -rf $(OBJDIR) $(TARGET)

run: all
	./$(TARGET)

debug: CFLAGS += -DDEBUG
debug: CXXFLAGS += -DDEBUG
debug: all

install: all
	cp $(TARGET) /usr/local/bin/
"#;

const MAKEFILE_ASM: &str = r#"AS = as
LD = ld
TARGET = _PROJECT_NAME_
SRCDIR = src
OBJDIR = build
SOURCES = $(wildcard $(SRCDIR)/*.s)
OBJECTS = $(SOURCES:$(SRCDIR)/%.s=$(OBJDIR)/%.o)

.PHONY: all clean run install

all: $(OBJDIR) $(TARGET)

$(TARGET): $(OBJECTS)
	$(LD) $(OBJECTS) -o $@

$(OBJDIR)/%.o: $(SRCDIR)/%.s
	$(AS) $< -o $@

$(OBJDIR):
	mkdir -p $(OBJDIR)

clean:
	rm -rf $(OBJDIR) $(TARGET)

run: all
	./$(TARGET)

install: all
	cp $(TARGET) /usr/local/bin/
"#;

// -----------------------------------------------------------------------------
// CMake
// -----------------------------------------------------------------------------

const CMAKE_C: &str = r#"cmake_minimum_required(VERSION 3.10)
project(_PROJECT_NAME_ C)

set(CMAKE_C_STANDARD 99)
set(CMAKE_C_STANDARD_REQUIRED ON)
set(CMAKE_C_FLAGS "${CMAKE_C_FLAGS} -Wall -Wextra -g")

file(GLOB SOURCES "src/*.c")

add_executable(_PROJECT_NAME_ ${SOURCES})

set(CMAKE_RUNTIME_OUTPUT_DIRECTORY ${CMAKE_BINARY_DIR})
"#;

const CMAKE_CPP: &str = r#"cmake_minimum_required(VERSION 3.10)
project(_PROJECT_NAME_ CXX)

set(CMAKE_CXX_STANDARD 17)
set(CMAKE_CXX_STANDARD_REQUIRED ON)
set(CMAKE_CXX_FLAGS "${CMAKE_CXX_FLAGS} -Wall -Wextra -g")

file(GLOB SOURCES "src/*.cpp")

add_executable(_PROJECT_NAME_ ${SOURCES})

set(CMAKE_RUNTIME_OUTPUT_DIRECTORY ${CMAKE_BINARY_DIR})
"#;

const CMAKE_MIXED: &str = r#"cmake_minimum_required(VERSION 3.10)
project(_PROJECT_NAME_ C CXX)

set(CMAKE_C_STANDARD 99)
set(CMAKE_C_STANDARD_REQUIRED ON)
set(CMAKE_CXX_STANDARD 17)
set(CMAKE_CXX_STANDARD_REQUIRED ON)

set(CMAKE_C_FLAGS "${CMAKE_C_FLAGS} -Wall -Wextra -g")
set(CMAKE_CXX_FLAGS "${CMAKE_CXX_FLAGS} -Wall -Wextra -g")

file(GLOB SOURCES "src/*.c" "src/*.cpp")

add_executable(_PROJECT_NAME_ ${SOURCES})

set(CMAKE_RUNTIME_OUTPUT_DIRECTORY ${CMAKE_BINARY_DIR})
"#;

const CMAKE_ASM: &str = r#"cmake_minimum_required(VERSION 3.10)
project(_PROJECT_NAME_ ASM)

file(GLOB SOURCES "src/*.s")

add_executable(_PROJECT_NAME_ ${SOURCES})
set_target_properties(_PROJECT_NAME_ PROPERTIES LINKER_LANGUAGE ASM)
target_link_options(_PROJECT_NAME_ PRIVATE -nostdlib -static)

set(CMAKE_RUNTIME_OUTPUT_DIRECTORY ${CMAKE_BINARY_DIR})
"#;

// -----------------------------------------------------------------------------
// autocc / misc
// -----------------------------------------------------------------------------

const AUTOCC: &str = r#"# This 'autocc.toml' was written by dvk, not by autocc. Edit with caution.
[compilers]
as = 'as'
cc = 'clang'
cxx = 'clang++'

[paths]
exclude_patterns = []
include_dirs = []

[project]
build_dir = "build"
default_target = "_PROJECT_NAME_"

[[targets]]
name = "_PROJECT_NAME_"
main_file = _MAIN_FILE_
sources = _SOURCES_
output_name = "_PROJECT_NAME_"
cflags = "-Wall -Wextra -g"
cxxflags = "-Wall -Wextra -g"
"#;

const GITIGNORE: &str = r#"# Build artifacts
build/
*.o
*.obj
*.exe
*.out
a.out
/_PROJECT_NAME_

# IDE files
.vscode/
.idea/
*.swp
*.swo
compile_commands.json

# System files
.DS_Store
Thumbs.db
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_of(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_c_makefile_target_is_project_name() {
        let content = makefile("hello_world-2", ProjectType::C);
        assert!(content.contains("TARGET = hello_world-2\n"));
        assert!(content.starts_with("CC = gcc"));
        assert!(!content.contains(PLACEHOLDER));
    }

    #[test]
    fn test_no_placeholder_survives_any_combination() {
        for project_type in ProjectType::all() {
            for build in BuildSystem::all() {
                for file in project_files("demo", project_type, build) {
                    assert!(
                        !file.contents.contains(PLACEHOLDER),
                        "{} for {} / {} still has a placeholder",
                        file.path,
                        project_type,
                        build
                    );
                    assert!(!file.contents.contains("_MAIN_FILE_"));
                    assert!(!file.contents.contains("_SOURCES_"));
                }
            }
        }
    }

    #[test]
    fn test_file_sets_per_type() {
        assert_eq!(
            paths_of(&project_files("a", ProjectType::C, BuildSystem::Make)),
            vec!["src/main.c", "Makefile", ".gitignore", "README.md"]
        );
        assert_eq!(
            paths_of(&project_files("a", ProjectType::Mixed, BuildSystem::CMake)),
            vec!["src/main.c", "src/main.cpp", "CMakeLists.txt", ".gitignore", "README.md"]
        );
        assert_eq!(
            paths_of(&project_files("a", ProjectType::Asm, BuildSystem::Autocc)),
            vec!["src/main.s", "autocc.toml", ".gitignore", "README.md"]
        );
        assert_eq!(
            paths_of(&project_files("a", ProjectType::Cpp, BuildSystem::None)),
            vec!["src/main.cpp", ".gitignore", "README.md"]
        );
    }

    #[test]
    fn test_cmake_languages() {
        assert!(cmake_lists("p", ProjectType::C).contains("project(p C)"));
        assert!(cmake_lists("p", ProjectType::Cpp).contains("project(p CXX)"));
        assert!(cmake_lists("p", ProjectType::Mixed).contains("project(p C CXX)"));
        assert!(cmake_lists("p", ProjectType::Asm).contains("project(p ASM)"));
    }

    #[test]
    fn test_autocc_sources_by_type() {
        let mixed = autocc_toml("p", ProjectType::Mixed);
        assert!(mixed.contains("main_file = './src/main.cpp'"));
        assert!(mixed.contains("sources = [ './src/main.c', './src/main.cpp' ]"));
        assert!(mixed.contains("default_target = \"p\""));

        let asm = autocc_toml("p", ProjectType::Asm);
        assert!(asm.contains("sources = [ './src/main.s' ]"));
    }

    #[test]
    fn test_readme_follows_build_system() {
        let make = readme("p", ProjectType::C, BuildSystem::Make);
        assert!(make.starts_with("# p\n"));
        assert!(make.contains("make run"));

        let manual = readme("p", ProjectType::Asm, BuildSystem::None);
        assert!(manual.contains("ld main.o -o p"));
        assert!(manual.contains("./p"));
    }

    #[test]
    fn test_gitignore_ignores_binary() {
        let files = project_files("tool", ProjectType::C, BuildSystem::None);
        let gitignore = files.iter().find(|f| f.path == ".gitignore").unwrap();
        assert!(gitignore.contents.contains("\n/tool\n"));
    }

    #[test]
    fn test_cpp_main_uses_iostream() {
        let files = project_files("x", ProjectType::Cpp, BuildSystem::None);
        assert!(files[0].contents.contains("std::cout"));
    }

    #[test]
    fn test_mixed_project_defines_main_once() {
        let files = project_files("m", ProjectType::Mixed, BuildSystem::Make);
        let defining_main: Vec<&str> = files
            .iter()
            .filter(|f| f.path.starts_with("src/") && f.contents.contains("int main("))
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(defining_main, vec!["src/main.cpp"]);

        let c_part = &files[0];
        assert_eq!(c_part.path, "src/main.c");
        assert!(c_part.contents.contains("void hello_from_c(void)"));
        let cpp_main = &files[1];
        assert!(cpp_main.contents.contains("extern \"C\" void hello_from_c(void);"));
        assert!(cpp_main.contents.contains("hello_from_c();"));
    }

    #[test]
    fn test_mains_take_no_unused_parameters() {
        for project_type in [ProjectType::C, ProjectType::Cpp, ProjectType::Mixed] {
            for file in project_files("x", project_type, BuildSystem::None) {
                assert!(!file.contents.contains("argc"), "{} declares argc", file.path);
            }
        }
        let c = project_files("x", ProjectType::C, BuildSystem::None);
        assert!(c[0].contents.contains("int main(void)"));
    }
}
