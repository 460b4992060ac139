use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rsparse_core::TextChangeRange;
use rsparse_parser::{parse_source_file, update_source_file, ParseOptions};

// A medium-size TypeScript source with a mix of declarations and statements
const TYPESCRIPT_SOURCE: &str = r#"
import { EventEmitter } from 'events';

/**
 * A registered user.
 * @property {number} id
 */
interface User {
    id: number;
    name: string;
    email: string;
    age?: number;
    preferences: UserPreferences;
}

interface UserPreferences {
    theme: 'light' | 'dark';
    notifications: boolean;
    language: string;
}

type UserID = number;
type UserMap = Map<UserID, User>;
type Readonlyish<T> = { readonly [K in keyof T]: T[K] extends object ? Readonlyish<T[K]> : T[K] };

export class UserService extends EventEmitter {
    private users: UserMap = new Map();
    private nextId: UserID = 1;

    createUser(name: string, email: string): User {
        const user: User = {
            id: this.nextId++,
            name,
            email,
            preferences: { theme: 'light', notifications: true, language: 'en' },
        };
        this.users.set(user.id, user);
        this.emit('created', user);
        return user;
    }

    getUserById(id: UserID): User | undefined {
        return this.users.get(id);
    }

    updateUser(id: UserID, updates: Partial<User>): boolean {
        const user = this.users.get(id);
        if (!user) return false;
        this.users.set(id, { ...user, ...updates });
        return true;
    }

    *entries(): IterableIterator<[UserID, User]> {
        for (const [id, user] of this.users) {
            yield [id, user];
        }
    }
}

export function filterUsers<T extends User>(users: T[], predicate: (user: T) => boolean): T[] {
    const result: T[] = [];
    for (let i = 0; i < users.length; i++) {
        if (predicate(users[i])) {
            result.push(users[i]);
        }
    }
    return result;
}

export async function fetchUserData(id: UserID): Promise<User | null> {
    try {
        const response = await fetch(`/api/users/${id}`);
        return response.ok ? ((await response.json()) as User) : null;
    } catch (error) {
        console.error(`failed to fetch ${id}:`, error);
        return null;
    }
}

export const processUsers = (users: User[]): number => users.reduce((sum, user) => sum + (user.age ?? 0), 0);

export default UserService;
"#;

fn bench_parse_typescript(c: &mut Criterion) {
    c.bench_function("parse_typescript_medium", |b| {
        b.iter(|| {
            let options = ParseOptions::for_file_name("bench.ts");
            let source_file = parse_source_file("bench.ts", black_box(TYPESCRIPT_SOURCE), options);
            black_box(source_file);
        });
    });
}

fn bench_incremental_edit(c: &mut Criterion) {
    let start = TYPESCRIPT_SOURCE.find("return true;").unwrap_or(0) as u32;
    let change = TextChangeRange::replacement(start + 7, 4, "false");
    let new_text = change
        .apply(TYPESCRIPT_SOURCE, "false")
        .expect("edit inside the source");

    c.bench_function("reparse_typescript_medium_edit", |b| {
        b.iter_batched(
            || parse_source_file("bench.ts", TYPESCRIPT_SOURCE, ParseOptions::for_file_name("bench.ts")),
            |file| {
                let updated = update_source_file(file, black_box(&new_text), change).expect("valid change");
                black_box(updated);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_parse_typescript, bench_incremental_edit);
criterion_main!(benches);
